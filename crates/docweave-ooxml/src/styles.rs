//! Style definitions parsing (word/styles.xml)
//!
//! Produces an *unresolved* [`StyleSheet`]: every style carries only the
//! properties it declares itself. Flattening `basedOn` chains is left to
//! the cascade.

use docweave_ast::{PropertySet, StyleDefinition, StyleKind, StyleSheet};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::properties::{apply_paragraph_property, apply_run_property, get_attr};

/// Which property bag child elements are written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Paragraph,
    Run,
}

/// Where the parser currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    None,
    ParagraphDefault,
    RunDefault,
    Style,
}

/// Parse `word/styles.xml`
///
/// # Example
///
/// ```
/// use docweave_ooxml::styles::parse_styles;
/// use docweave_ooxml::test_utils::styles_xml;
///
/// let xml = styles_xml(
///     r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal">
///          <w:name w:val="Normal"/>
///          <w:rPr><w:sz w:val="22"/></w:rPr>
///        </w:style>"#,
/// );
/// let sheet = parse_styles(xml.as_bytes()).unwrap();
/// assert_eq!(sheet.defaults.paragraph.as_deref(), Some("Normal"));
/// assert_eq!(sheet.styles[0].run_props.font_size_pt(), Some(11.0));
/// ```
pub fn parse_styles(xml: &[u8]) -> Result<StyleSheet> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut parser = StylesParser::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.open(e),
            Ok(Event::Empty(ref e)) => parser.element(e),
            Ok(Event::End(ref e)) => parser.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "Parsed {} styles (default paragraph style: {:?})",
        parser.sheet.styles.len(),
        parser.sheet.defaults.paragraph
    );
    Ok(parser.sheet)
}

#[derive(Debug)]
struct StylesParser {
    sheet: StyleSheet,
    current: Option<StyleBuilder>,
    owner: Owner,
    section: Section,
    /// Inside `w:tblStylePr`, whose properties apply to table regions only
    in_conditional: bool,
}

impl Default for StylesParser {
    fn default() -> Self {
        Self {
            sheet: StyleSheet::new(),
            current: None,
            owner: Owner::None,
            section: Section::None,
            in_conditional: false,
        }
    }
}

impl StylesParser {
    /// A start tag that may contain children
    fn open(&mut self, e: &BytesStart) {
        if self.in_conditional {
            return;
        }
        match e.local_name().as_ref() {
            b"tblStylePr" => self.in_conditional = true,
            b"pPrDefault" => self.owner = Owner::ParagraphDefault,
            b"rPrDefault" => self.owner = Owner::RunDefault,
            b"style" => {
                self.current = Some(StyleBuilder::from_element(e));
                self.owner = Owner::Style;
            }
            b"pPr" if self.owner != Owner::None => self.section = Section::Paragraph,
            b"rPr" if self.owner != Owner::None => self.section = Section::Run,
            _ => self.element(e),
        }
    }

    /// A leaf element, or a start tag with no special meaning
    fn element(&mut self, e: &BytesStart) {
        if self.in_conditional {
            return;
        }
        let section = self.section;
        if section != Section::None {
            if let Some(props) = self.target() {
                match section {
                    Section::Paragraph => apply_paragraph_property(props, e),
                    Section::Run => apply_run_property(props, e),
                    Section::None => {}
                }
            }
            return;
        }

        if e.local_name().as_ref() == b"style" {
            // <w:style .../> with no children
            self.finish(StyleBuilder::from_element(e));
            return;
        }
        let Some(style) = self.current.as_mut() else {
            return;
        };
        match e.local_name().as_ref() {
            b"name" => style.name = get_attr(e, b"w:val"),
            b"basedOn" => style.based_on = get_attr(e, b"w:val"),
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        if self.in_conditional {
            if name == b"tblStylePr" {
                self.in_conditional = false;
            }
            return;
        }
        match name {
            b"pPr" | b"rPr" => self.section = Section::None,
            b"pPrDefault" | b"rPrDefault" => self.owner = Owner::None,
            b"style" => {
                self.owner = Owner::None;
                self.section = Section::None;
                if let Some(builder) = self.current.take() {
                    self.finish(builder);
                }
            }
            _ => {}
        }
    }

    fn finish(&mut self, builder: StyleBuilder) {
        let is_default = builder.is_default;
        let Some(style) = builder.build() else {
            log::warn!("Skipping style without w:styleId");
            return;
        };
        if is_default {
            self.sheet.defaults.set(style.kind, style.id.clone());
        }
        self.sheet.push(style);
    }

    /// The property bag the current section writes into
    fn target(&mut self) -> Option<&mut PropertySet> {
        let defaults = &mut self.sheet.document_defaults;
        match (self.owner, self.section) {
            (Owner::ParagraphDefault, Section::Paragraph) => Some(&mut defaults.paragraph_props),
            (Owner::RunDefault, Section::Run) => Some(&mut defaults.run_props),
            (Owner::Style, Section::Paragraph) => {
                self.current.as_mut().map(|s| &mut s.paragraph_props)
            }
            (Owner::Style, Section::Run) => self.current.as_mut().map(|s| &mut s.run_props),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    kind: StyleKind,
    based_on: Option<String>,
    is_default: bool,
    paragraph_props: PropertySet,
    run_props: PropertySet,
}

impl StyleBuilder {
    fn from_element(e: &BytesStart) -> Self {
        Self {
            id: get_attr(e, b"w:styleId"),
            kind: get_attr(e, b"w:type")
                .map(|t| StyleKind::parse(&t))
                .unwrap_or_default(),
            is_default: matches!(
                get_attr(e, b"w:default").as_deref(),
                Some("1") | Some("true")
            ),
            ..Self::default()
        }
    }

    fn build(self) -> Option<StyleDefinition> {
        let id = self.id?;
        let mut style = StyleDefinition::new(id.clone())
            .with_name(self.name.unwrap_or(id))
            .with_kind(self.kind)
            .with_paragraph_props(self.paragraph_props)
            .with_run_props(self.run_props);
        if let Some(base) = self.based_on {
            style = style.based_on(base);
        }
        Some(style)
    }
}
