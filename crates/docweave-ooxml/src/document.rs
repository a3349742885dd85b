//! Document content parsing (word/document.xml)
//!
//! Extracts paragraphs, runs and (nested) tables with their *explicit*
//! formatting only. Style references and list membership are recorded as
//! ids for the cascade to resolve.

use docweave_ast::{
    Block, Document, NumberingRef, Paragraph, PropertySet, Run, RunToken, Table, TableCell,
    TableRow,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::properties::{apply_paragraph_property, apply_run_property, get_attr, toggle};

/// Parse `word/document.xml`
///
/// # Example
///
/// ```
/// use docweave_ooxml::document::parse_document;
/// use docweave_ooxml::test_utils::document_xml;
///
/// let xml = document_xml(
///     r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Report</w:t></w:r></w:p>"#,
/// );
/// let doc = parse_document(xml.as_bytes()).unwrap();
/// let paragraph = doc.paragraphs()[0];
/// assert_eq!(paragraph.style_id.as_deref(), Some("Title"));
/// assert_eq!(paragraph.text(), "Report");
/// ```
pub fn parse_document(xml: &[u8]) -> Result<Document> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut parser = DocumentParser::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.open(e)?,
            Ok(Event::Empty(ref e)) => parser.element(e)?,
            Ok(Event::End(ref e)) => parser.close(e.local_name().as_ref()),
            Ok(Event::Text(ref e)) => {
                if parser.in_text && parser.skip_depth == 0 {
                    let text = e.unescape()?;
                    parser.push_text(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "Parsed document: {} blocks, {} paragraphs",
        parser.document.blocks.len(),
        parser.document.paragraphs().len()
    );
    Ok(parser.document)
}

/// Containers whose content is not part of the text flow
fn is_skipped(name: &[u8]) -> bool {
    matches!(
        name,
        b"drawing" | b"pict" | b"object" | b"AlternateContent" | b"del"
    )
}

#[derive(Debug, Default)]
struct TableBuilder {
    table: Table,
    row: Option<TableRow>,
    cell: Option<TableCell>,
}

#[derive(Debug, Default)]
struct ParagraphBuilder {
    paragraph: Paragraph,
    num_id: Option<String>,
    ilvl: Option<u32>,
}

impl ParagraphBuilder {
    fn build(self) -> Paragraph {
        let mut paragraph = self.paragraph;
        // numId 0 removes list membership inherited from a style
        paragraph.numbering = self
            .num_id
            .filter(|id| id != "0")
            .map(|id| NumberingRef::new(id, self.ilvl.unwrap_or(0)));
        paragraph
    }
}

#[derive(Debug, Default)]
struct RunBuilder {
    run: Run,
    properties: PropertySet,
}

impl RunBuilder {
    fn build(self) -> Run {
        let mut run = self.run;
        run.properties = (!self.properties.is_empty()).then_some(self.properties);
        run
    }
}

#[derive(Debug, Default)]
struct DocumentParser {
    document: Document,
    tables: Vec<TableBuilder>,
    paragraph: Option<ParagraphBuilder>,
    run: Option<RunBuilder>,
    in_ppr: bool,
    in_ppr_rpr: bool,
    in_rpr: bool,
    in_text: bool,
    skip_depth: usize,
}

impl DocumentParser {
    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let name = e.local_name();
        let name = name.as_ref();

        if is_skipped(name) {
            self.skip_depth += 1;
            return Ok(());
        }
        if self.skip_depth > 0 {
            return Ok(());
        }

        match name {
            b"p" => self.paragraph = Some(ParagraphBuilder::default()),
            b"pPr" if self.paragraph.is_some() => self.in_ppr = true,
            b"rPr" if self.in_ppr => self.in_ppr_rpr = true,
            b"r" if self.paragraph.is_some() => self.run = Some(RunBuilder::default()),
            b"rPr" if self.run.is_some() => self.in_rpr = true,
            b"t" if self.run.is_some() => self.in_text = true,
            b"tbl" => self.tables.push(TableBuilder::default()),
            b"tr" => {
                if let Some(table) = self.tables.last_mut() {
                    table.row = Some(TableRow::default());
                }
            }
            b"tc" => {
                if let Some(table) = self.tables.last_mut() {
                    table.cell = Some(TableCell::default());
                }
            }
            _ => self.element(e)?,
        }
        Ok(())
    }

    fn element(&mut self, e: &BytesStart) -> Result<()> {
        if self.skip_depth > 0 {
            return Ok(());
        }
        let name = e.local_name();
        let name = name.as_ref();

        if self.in_ppr {
            if self.in_ppr_rpr {
                return Ok(());
            }
            let Some(builder) = self.paragraph.as_mut() else {
                return Ok(());
            };
            match name {
                b"pStyle" => builder.paragraph.style_id = get_attr(e, b"w:val"),
                b"numId" => builder.num_id = get_attr(e, b"w:val"),
                b"ilvl" => builder.ilvl = Some(ilvl_value(e)?),
                _ => apply_paragraph_property(&mut builder.paragraph.properties, e),
            }
            return Ok(());
        }

        if let Some(builder) = self.run.as_mut() {
            if self.in_rpr {
                match name {
                    b"rStyle" => builder.run.style_id = get_attr(e, b"w:val"),
                    _ => apply_run_property(&mut builder.properties, e),
                }
            } else if name == b"tab" {
                builder.run.tokens.push(RunToken::Tab);
            }
            return Ok(());
        }

        match name {
            b"p" => {
                // <w:p/>: an empty paragraph
                self.paragraph = Some(ParagraphBuilder::default());
                self.close(b"p");
            }
            b"tblStyle" => {
                if let Some(table) = self.tables.last_mut() {
                    table.table.style_id = get_attr(e, b"w:val");
                }
            }
            b"tblHeader" => {
                if let Some(row) = self.tables.last_mut().and_then(|t| t.row.as_mut()) {
                    row.is_header = toggle(e);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        if is_skipped(name) {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        match name {
            b"t" => self.in_text = false,
            b"rPr" if self.in_ppr_rpr => self.in_ppr_rpr = false,
            b"rPr" => self.in_rpr = false,
            b"pPr" => self.in_ppr = false,
            b"r" => {
                self.in_rpr = false;
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.paragraph.runs.push(run.build());
                }
            }
            b"p" => {
                self.in_ppr = false;
                if let Some(paragraph) = self.paragraph.take() {
                    self.push_block(Block::Paragraph(paragraph.build()));
                }
            }
            b"tc" => {
                if let Some(table) = self.tables.last_mut() {
                    if let (Some(cell), Some(row)) = (table.cell.take(), table.row.as_mut()) {
                        row.cells.push(cell);
                    }
                }
            }
            b"tr" => {
                if let Some(table) = self.tables.last_mut() {
                    if let Some(row) = table.row.take() {
                        table.table.rows.push(row);
                    }
                }
            }
            b"tbl" => {
                if let Some(builder) = self.tables.pop() {
                    self.push_block(Block::Table(builder.table));
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        let Some(builder) = self.run.as_mut() else {
            return;
        };
        match builder.run.tokens.last_mut() {
            Some(RunToken::Text(existing)) => existing.push_str(text),
            _ => builder.run.tokens.push(RunToken::Text(text.to_string())),
        }
    }

    /// Append a finished block to the innermost open container
    fn push_block(&mut self, block: Block) {
        match self.tables.last_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => cell.blocks.push(block),
            None => self.document.blocks.push(block),
        }
    }
}

fn ilvl_value(e: &BytesStart) -> Result<u32> {
    let raw = get_attr(e, b"w:val").unwrap_or_default();
    raw.trim().parse().map_err(|_| OoxmlError::InvalidValue {
        attribute: "w:ilvl".to_string(),
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::document_xml;
    use docweave_ast::keys;

    fn parse(body: &str) -> Document {
        parse_document(document_xml(body).as_bytes()).unwrap()
    }

    #[test]
    fn test_paragraph_with_style_and_runs() {
        let doc = parse(
            r#"<w:p>
                 <w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr>
                 <w:r><w:t xml:space="preserve">Hello </w:t></w:r>
                 <w:r><w:rPr><w:b/></w:rPr><w:t>World</w:t></w:r>
               </w:p>"#,
        );

        let paragraph = doc.paragraphs()[0];
        assert_eq!(paragraph.style_id.as_deref(), Some("Heading1"));
        assert_eq!(paragraph.properties.str(keys::ALIGNMENT), Some("center"));
        assert_eq!(paragraph.runs.len(), 2);
        assert_eq!(paragraph.text(), "Hello World");
        assert!(paragraph.runs[0].properties.is_none());
        assert_eq!(
            paragraph.runs[1].properties.as_ref().unwrap().bool(keys::BOLD),
            Some(true)
        );
    }

    #[test]
    fn test_numbering_reference() {
        let doc = parse(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="4"/></w:numPr></w:pPr>
                 <w:r><w:t>Item</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:numId w:val="0"/></w:numPr></w:pPr></w:p>"#,
        );

        let paragraphs = doc.paragraphs();
        assert_eq!(paragraphs[0].numbering, Some(NumberingRef::new("4", 1)));
        assert_eq!(paragraphs[1].numbering, None);
    }

    #[test]
    fn test_paragraph_mark_run_properties_ignored() {
        let doc = parse(
            r#"<w:p><w:pPr><w:rPr><w:b/></w:rPr><w:spacing w:after="0"/></w:pPr>
                 <w:r><w:t>x</w:t></w:r></w:p>"#,
        );

        let paragraph = doc.paragraphs()[0];
        assert_eq!(paragraph.properties.bool(keys::BOLD), None);
        assert_eq!(
            paragraph.properties.f64_at(&[keys::SPACING, keys::AFTER_PT]),
            Some(0.0)
        );
        assert!(paragraph.runs[0].properties.is_none());
    }

    #[test]
    fn test_tabs_and_character_style() {
        let doc = parse(
            r#"<w:p><w:r><w:rPr><w:rStyle w:val="Strong"/></w:rPr>
                 <w:t>Name</w:t><w:tab/><w:t>Value</w:t></w:r></w:p>"#,
        );

        let run = &doc.paragraphs()[0].runs[0];
        assert_eq!(run.style_id.as_deref(), Some("Strong"));
        assert!(run.properties.is_none());
        assert_eq!(
            run.tokens,
            vec![
                RunToken::Text("Name".to_string()),
                RunToken::Tab,
                RunToken::Text("Value".to_string()),
            ]
        );
    }

    #[test]
    fn test_escaped_text() {
        let doc = parse(r#"<w:p><w:r><w:t>a &amp; b &lt;c&gt;</w:t></w:r></w:p>"#);
        assert_eq!(doc.paragraphs()[0].text(), "a & b <c>");
    }

    #[test]
    fn test_unknown_entity_in_text_is_an_error() {
        let xml = document_xml(r#"<w:p><w:r><w:t>a &bogus; b</w:t></w:r></w:p>"#);
        assert!(matches!(
            parse_document(xml.as_bytes()),
            Err(OoxmlError::Xml(_))
        ));
    }

    #[test]
    fn test_table_with_nested_table() {
        let doc = parse(
            r#"<w:tbl>
                 <w:tblPr><w:tblStyle w:val="Grid"/></w:tblPr>
                 <w:tr><w:trPr><w:tblHeader/></w:trPr>
                   <w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc>
                   <w:tc>
                     <w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
                     <w:p/>
                   </w:tc>
                 </w:tr>
               </w:tbl>
               <w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );

        assert_eq!(doc.blocks.len(), 2);
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.style_id.as_deref(), Some("Grid"));
        assert!(table.rows[0].is_header);
        assert_eq!(table.rows[0].cells.len(), 2);

        let second = &table.rows[0].cells[1];
        assert_eq!(second.blocks.len(), 2);
        assert!(matches!(second.blocks[0], Block::Table(_)));

        let texts: Vec<String> = doc.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["A", "inner", "", "after"]);
    }

    #[test]
    fn test_drawings_and_deletions_skipped() {
        let doc = parse(
            r#"<w:p>
                 <w:r><w:t>kept</w:t></w:r>
                 <w:r><w:drawing><wp:inline><w:p><w:r><w:t>textbox</w:t></w:r></w:p></wp:inline></w:drawing></w:r>
                 <w:del><w:r><w:delText>gone</w:delText></w:r></w:del>
                 <w:ins><w:r><w:t>!</w:t></w:r></w:ins>
               </w:p>"#,
        );

        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.paragraphs()[0].text(), "kept!");
    }

    #[test]
    fn test_hyperlink_runs_included() {
        let doc = parse(
            r#"<w:p><w:hyperlink w:anchor="x"><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>"#,
        );
        assert_eq!(doc.paragraphs()[0].text(), "link");
    }

    #[test]
    fn test_invalid_ilvl() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="deep"/><w:numId w:val="1"/></w:numPr></w:pPr></w:p>"#,
        );
        assert!(matches!(
            parse_document(xml.as_bytes()),
            Err(OoxmlError::InvalidValue { .. })
        ));
    }
}
