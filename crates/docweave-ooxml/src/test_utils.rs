//! In-memory DOCX fixtures
//!
//! Builds small but structurally valid DOCX archives so tests across the
//! workspace do not need binary fixture files.
//!
//! # Example
//! ```
//! use docweave_ooxml::test_utils::DocxBuilder;
//! use docweave_ooxml::DocxPackage;
//!
//! let bytes = DocxBuilder::new()
//!     .body(r#"<w:p><w:r><w:t>Hi</w:t></w:r></w:p>"#)
//!     .build()?;
//! let package = DocxPackage::from_bytes(&bytes).unwrap();
//! assert_eq!(package.document.paragraphs()[0].text(), "Hi");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{Cursor, Write};

use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// Wrap body content in a `w:document`
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
        W_NS, body
    )
}

/// Wrap style content in a `w:styles`
pub fn styles_xml(content: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:styles xmlns:w="{}">{}</w:styles>"#,
        W_NS, content
    )
}

/// Wrap numbering content in a `w:numbering`
pub fn numbering_xml(content: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:numbering xmlns:w="{}">{}</w:numbering>"#,
        W_NS, content
    )
}

/// Builder for an in-memory DOCX archive
#[derive(Debug, Clone)]
pub struct DocxBuilder {
    body: Option<String>,
    styles: Option<String>,
    numbering: Option<String>,
}

impl Default for DocxBuilder {
    fn default() -> Self {
        Self {
            body: Some(String::new()),
            styles: None,
            numbering: None,
        }
    }
}

impl DocxBuilder {
    /// A package with an empty body
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content of `w:body`
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a styles part with the given `w:styles` content
    pub fn styles(mut self, content: impl Into<String>) -> Self {
        self.styles = Some(content.into());
        self
    }

    /// Add a numbering part with the given `w:numbering` content
    pub fn numbering(mut self, content: impl Into<String>) -> Self {
        self.numbering = Some(content.into());
        self
    }

    /// Leave out the main document part
    pub fn without_document(mut self) -> Self {
        self.body = None;
        self
    }

    /// Produce the archive bytes
    pub fn build(&self) -> ZipResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;

        if let Some(body) = &self.body {
            zip.start_file("word/document.xml", options)?;
            zip.write_all(document_xml(body).as_bytes())?;
        }
        if let Some(styles) = &self.styles {
            zip.start_file("word/styles.xml", options)?;
            zip.write_all(styles_xml(styles).as_bytes())?;
        }
        if let Some(numbering) = &self.numbering {
            zip.start_file("word/numbering.xml", options)?;
            zip.write_all(numbering_xml(numbering).as_bytes())?;
        }

        zip.finish()?;
        Ok(buffer.into_inner())
    }
}
