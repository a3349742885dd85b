//! Numbering definitions parsing (word/numbering.xml)
//!
//! Word splits list definitions in two: `w:abstractNum` holds the level
//! formats, `w:num` is the id paragraphs reference and may override
//! individual levels. The resulting [`NumberingTable`] is keyed by the
//! `w:numId` paragraphs use, with overrides already applied.
//!
//! Levels are collected as partial property sets keyed like the
//! serialized [`NumberingLevel`]. A `w:lvlOverride` replaces whatever it
//! declares and keeps the rest of the abstract level.

use std::collections::{BTreeMap, HashMap};

use docweave_ast::{Justification, NumberingLevel, NumberingTable, PropertySet, MAX_LEVEL};
use docweave_core::{base_preserves_merge, override_merge};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Value;

use crate::error::{OoxmlError, Result};
use crate::properties::{apply_paragraph_property, apply_run_property, get_attr, twips_attr};

const ILVL: &str = "ilvl";
const START: &str = "start";
const NUM_FMT: &str = "numFmt";
const LVL_TEXT: &str = "lvlText";
const JUSTIFICATION: &str = "justification";
const INDENT_OVERRIDE: &str = "indentOverride";
const TAB_STOP_PT: &str = "tabStopPt";
const FONT_HINT: &str = "fontHint";

/// Partial level definitions keyed by `ilvl`
type Levels = BTreeMap<u8, PropertySet>;

/// Parse `word/numbering.xml`
///
/// # Example
///
/// ```
/// use docweave_ast::NumFormat;
/// use docweave_ooxml::numbering::parse_numbering;
/// use docweave_ooxml::test_utils::numbering_xml;
///
/// let xml = numbering_xml(
///     r#"<w:abstractNum w:abstractNumId="0">
///          <w:lvl w:ilvl="0"><w:numFmt w:val="lowerRoman"/><w:lvlText w:val="%1)"/></w:lvl>
///        </w:abstractNum>
///        <w:num w:numId="3"><w:abstractNumId w:val="0"/></w:num>"#,
/// );
/// let table = parse_numbering(xml.as_bytes()).unwrap();
/// let level = table.level("3", 0).unwrap();
/// assert_eq!(level.num_fmt, NumFormat::LowerRoman);
/// assert_eq!(level.lvl_text, "%1)");
/// ```
pub fn parse_numbering(xml: &[u8]) -> Result<NumberingTable> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut parser = NumberingParser::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.open(e)?,
            Ok(Event::Empty(ref e)) => parser.element(e)?,
            Ok(Event::End(ref e)) => parser.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Paragraph,
    Run,
}

#[derive(Debug, Default)]
struct NumInstance {
    num_id: String,
    abstract_id: Option<String>,
    overrides: Levels,
    start_overrides: BTreeMap<u8, u32>,
}

#[derive(Debug)]
struct LevelBuilder {
    ilvl: u8,
    fields: PropertySet,
    paragraph_props: PropertySet,
    run_props: PropertySet,
}

impl LevelBuilder {
    fn new(ilvl: u8) -> Self {
        Self {
            ilvl,
            fields: PropertySet::new().with(ILVL, ilvl),
            paragraph_props: PropertySet::new(),
            run_props: PropertySet::new(),
        }
    }

    fn build(mut self) -> (u8, PropertySet) {
        if let Some(indent) = self.paragraph_props.indent_only() {
            self.fields.insert(INDENT_OVERRIDE, indent);
        }
        if let Some(font) = self.run_props.str(docweave_ast::keys::FONT_FAMILY) {
            self.fields.insert(FONT_HINT, font);
        }
        (self.ilvl, self.fields)
    }
}

#[derive(Debug)]
struct NumberingParser {
    abstracts: HashMap<String, Levels>,
    nums: Vec<NumInstance>,
    current_abstract: Option<(String, Levels)>,
    current_num: Option<NumInstance>,
    override_ilvl: Option<u8>,
    level: Option<LevelBuilder>,
    section: Section,
}

impl Default for NumberingParser {
    fn default() -> Self {
        Self {
            abstracts: HashMap::new(),
            nums: Vec::new(),
            current_abstract: None,
            current_num: None,
            override_ilvl: None,
            level: None,
            section: Section::None,
        }
    }
}

impl NumberingParser {
    fn open(&mut self, e: &BytesStart) -> Result<()> {
        match e.local_name().as_ref() {
            b"abstractNum" => {
                let id = get_attr(e, b"w:abstractNumId").unwrap_or_default();
                self.current_abstract = Some((id, Levels::new()));
            }
            b"num" => {
                self.current_num = Some(NumInstance {
                    num_id: get_attr(e, b"w:numId").unwrap_or_default(),
                    ..NumInstance::default()
                });
            }
            b"lvlOverride" => self.override_ilvl = Some(ilvl_attr(e)?),
            b"lvl" => self.level = Some(LevelBuilder::new(ilvl_attr(e)?)),
            b"pPr" if self.level.is_some() => self.section = Section::Paragraph,
            b"rPr" if self.level.is_some() => self.section = Section::Run,
            _ => self.element(e)?,
        }
        Ok(())
    }

    fn element(&mut self, e: &BytesStart) -> Result<()> {
        let name = e.local_name();
        let name = name.as_ref();

        if let Some(level) = self.level.as_mut() {
            match (self.section, name) {
                (Section::Paragraph, b"tab") => {
                    let kind = get_attr(e, b"w:val");
                    if kind.as_deref() == Some("clear") {
                        return Ok(());
                    }
                    if let Some(pos) = twips_attr(e, &[b"w:pos"]) {
                        if kind.as_deref() == Some("num") || !level.fields.contains_key(TAB_STOP_PT) {
                            level.fields.insert(TAB_STOP_PT, pos);
                        }
                    }
                }
                (Section::Paragraph, _) => apply_paragraph_property(&mut level.paragraph_props, e),
                (Section::Run, _) => apply_run_property(&mut level.run_props, e),
                (Section::None, b"start") => {
                    level.fields.insert(START, number_attr(e, b"w:val")?);
                }
                (Section::None, b"numFmt") => {
                    if let Some(fmt) = get_attr(e, b"w:val") {
                        level.fields.insert(NUM_FMT, fmt);
                    }
                }
                (Section::None, b"lvlText") => {
                    level.fields.insert(LVL_TEXT, get_attr(e, b"w:val").unwrap_or_default());
                }
                (Section::None, b"lvlJc") => {
                    if let Some(jc) = get_attr(e, b"w:val") {
                        level.fields.insert(JUSTIFICATION, Justification::parse(&jc).as_str());
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        match name {
            b"lvl" => {
                self.level = Some(LevelBuilder::new(ilvl_attr(e)?));
                self.close(b"lvl");
            }
            b"abstractNumId" => {
                if let Some(num) = self.current_num.as_mut() {
                    num.abstract_id = get_attr(e, b"w:val");
                }
            }
            b"startOverride" => {
                if let (Some(num), Some(ilvl)) = (self.current_num.as_mut(), self.override_ilvl) {
                    num.start_overrides.insert(ilvl, number_attr(e, b"w:val")?);
                }
            }
            b"numStyleLink" | b"styleLink" => {
                log::debug!("Ignoring numbering style link {:?}", get_attr(e, b"w:val"));
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"pPr" | b"rPr" => self.section = Section::None,
            b"lvl" => {
                self.section = Section::None;
                let Some((ilvl, fields)) = self.level.take().map(LevelBuilder::build) else {
                    return;
                };
                if let Some(num) = self.current_num.as_mut() {
                    let ilvl = self.override_ilvl.unwrap_or(ilvl);
                    num.overrides.insert(ilvl, fields);
                } else if let Some((_, levels)) = self.current_abstract.as_mut() {
                    levels.insert(ilvl, fields);
                }
            }
            b"lvlOverride" => self.override_ilvl = None,
            b"abstractNum" => {
                if let Some((id, levels)) = self.current_abstract.take() {
                    self.abstracts.insert(id, levels);
                }
            }
            b"num" => {
                if let Some(num) = self.current_num.take() {
                    self.nums.push(num);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<NumberingTable> {
        let mut table = NumberingTable::new();

        for num in self.nums {
            let Some(abstract_levels) = num
                .abstract_id
                .as_ref()
                .and_then(|id| self.abstracts.get(id))
            else {
                log::warn!(
                    "Numbering instance '{}' references unknown abstractNum {:?}",
                    num.num_id,
                    num.abstract_id
                );
                continue;
            };

            let mut levels = abstract_levels.clone();
            for (ilvl, replacement) in num.overrides {
                let merged = match levels.get(&ilvl) {
                    Some(base) => override_merge(base, &replacement),
                    None => replacement,
                };
                levels.insert(ilvl, merged);
            }
            for (ilvl, start) in num.start_overrides {
                levels
                    .entry(ilvl)
                    .or_insert_with(|| PropertySet::new().with(ILVL, ilvl))
                    .insert(START, start);
            }

            let levels = levels
                .into_values()
                .map(complete_level)
                .collect::<Result<Vec<_>>>()?;
            table.insert(num.num_id, levels);
        }

        log::debug!("Parsed {} numbering instances", table.len());
        Ok(table)
    }
}

/// Fill unspecified fields and convert to a typed level
fn complete_level(partial: PropertySet) -> Result<NumberingLevel> {
    let defaults = PropertySet::new()
        .with(START, 1)
        .with(NUM_FMT, "decimal")
        .with(LVL_TEXT, "");
    let full = base_preserves_merge(&defaults, &partial);
    Ok(serde_json::from_value(Value::from(full))?)
}

fn ilvl_attr(e: &BytesStart) -> Result<u8> {
    match get_attr(e, b"w:ilvl") {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse::<u8>()
            .map(|ilvl| ilvl.min(MAX_LEVEL))
            .map_err(|_| OoxmlError::InvalidValue {
                attribute: "w:ilvl".to_string(),
                value: raw,
            }),
    }
}

fn number_attr(e: &BytesStart, name: &[u8]) -> Result<u32> {
    let raw = get_attr(e, name).unwrap_or_default();
    raw.trim().parse().map_err(|_| OoxmlError::InvalidValue {
        attribute: String::from_utf8_lossy(name).into_owned(),
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::numbering_xml;
    use docweave_ast::NumFormat;

    fn parse(content: &str) -> NumberingTable {
        parse_numbering(numbering_xml(content).as_bytes()).unwrap()
    }

    const OUTLINE: &str = r#"
        <w:abstractNum w:abstractNumId="10">
            <w:multiLevelType w:val="hybridMultilevel"/>
            <w:lvl w:ilvl="0">
                <w:start w:val="1"/>
                <w:numFmt w:val="decimal"/>
                <w:lvlText w:val="%1."/>
                <w:lvlJc w:val="left"/>
                <w:pPr>
                    <w:tabs><w:tab w:val="num" w:pos="720"/></w:tabs>
                    <w:ind w:left="720" w:hanging="360"/>
                </w:pPr>
            </w:lvl>
            <w:lvl w:ilvl="1">
                <w:start w:val="1"/>
                <w:numFmt w:val="lowerLetter"/>
                <w:lvlText w:val="%2)"/>
                <w:lvlJc w:val="right"/>
                <w:pPr><w:ind w:left="1440" w:hanging="360"/></w:pPr>
            </w:lvl>
        </w:abstractNum>
        <w:abstractNum w:abstractNumId="11">
            <w:lvl w:ilvl="0">
                <w:numFmt w:val="bullet"/>
                <w:lvlText w:val="&#61623;"/>
                <w:rPr><w:rFonts w:ascii="Symbol" w:hAnsi="Symbol" w:hint="default"/></w:rPr>
            </w:lvl>
        </w:abstractNum>
        <w:num w:numId="1"><w:abstractNumId w:val="10"/></w:num>
        <w:num w:numId="2"><w:abstractNumId w:val="11"/></w:num>"#;

    #[test]
    fn test_abstract_levels_resolved_through_num() {
        let table = parse(OUTLINE);
        assert_eq!(table.len(), 2);

        let first = table.level("1", 0).unwrap();
        assert_eq!(first.num_fmt, NumFormat::Decimal);
        assert_eq!(first.lvl_text, "%1.");
        assert_eq!(first.start, 1);
        assert_eq!(first.tab_stop_pt, Some(36.0));
        let indent = first.indent_override.as_ref().unwrap();
        assert_eq!(indent.indent_left_pt(), Some(36.0));
        assert_eq!(indent.hanging_pt(), Some(18.0));

        let second = table.level("1", 1).unwrap();
        assert_eq!(second.num_fmt, NumFormat::LowerLetter);
        assert_eq!(second.justification, Justification::Right);
        assert_eq!(second.tab_stop_pt, None);
    }

    #[test]
    fn test_bullet_font_hint() {
        let table = parse(OUTLINE);
        let bullet = table.level("2", 0).unwrap();
        assert_eq!(bullet.num_fmt, NumFormat::Bullet);
        assert_eq!(bullet.font_hint.as_deref(), Some("Symbol"));
        assert_eq!(bullet.lvl_text, "\u{F0B7}");
    }

    #[test]
    fn test_start_override() {
        let table = parse(&format!(
            r#"{}<w:num w:numId="5"><w:abstractNumId w:val="10"/>
                   <w:lvlOverride w:ilvl="0"><w:startOverride w:val="4"/></w:lvlOverride>
               </w:num>"#,
            OUTLINE
        ));

        let level = table.level("5", 0).unwrap();
        assert_eq!(level.start, 4);
        assert_eq!(level.lvl_text, "%1.");
        assert_eq!(table.level("1", 0).unwrap().start, 1);
    }

    #[test]
    fn test_level_override_replaces_only_declared_fields() {
        let table = parse(&format!(
            r#"{}<w:num w:numId="6"><w:abstractNumId w:val="10"/>
                   <w:lvlOverride w:ilvl="1">
                       <w:lvl w:ilvl="1">
                           <w:numFmt w:val="upperRoman"/>
                           <w:pPr><w:ind w:hanging="720"/></w:pPr>
                       </w:lvl>
                   </w:lvlOverride>
               </w:num>"#,
            OUTLINE
        ));

        let level = table.level("6", 1).unwrap();
        assert_eq!(level.num_fmt, NumFormat::UpperRoman);
        assert_eq!(level.lvl_text, "%2)");
        assert_eq!(level.justification, Justification::Right);
        let indent = level.indent_override.as_ref().unwrap();
        assert_eq!(indent.indent_left_pt(), Some(72.0));
        assert_eq!(indent.hanging_pt(), Some(36.0));
    }

    #[test]
    fn test_unknown_abstract_is_skipped() {
        let table = parse(r#"<w:num w:numId="9"><w:abstractNumId w:val="404"/></w:num>"#);
        assert!(table.is_empty());
    }

    #[test]
    fn test_level_defaults() {
        let table = parse(
            r#"<w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="2"/></w:abstractNum>
               <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>"#,
        );
        let level = table.level("1", 2).unwrap();
        assert_eq!(level.start, 1);
        assert_eq!(level.num_fmt, NumFormat::Decimal);
        assert_eq!(level.lvl_text, "");
        assert!(level.indent_override.is_none());
    }

    #[test]
    fn test_unknown_format_preserved() {
        let table = parse(
            r#"<w:abstractNum w:abstractNumId="0">
                   <w:lvl w:ilvl="0"><w:numFmt w:val="ordinal"/><w:lvlText w:val="%1"/></w:lvl>
               </w:abstractNum>
               <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>"#,
        );
        assert_eq!(
            table.level("1", 0).unwrap().num_fmt,
            NumFormat::Other("ordinal".to_string())
        );
    }

    #[test]
    fn test_invalid_ilvl_is_an_error() {
        let xml = numbering_xml(r#"<w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="x"/></w:abstractNum>"#);
        let err = parse_numbering(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, OoxmlError::InvalidValue { ref attribute, .. } if attribute == "w:ilvl"));
    }
}
