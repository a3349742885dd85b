//! A DOCX file with its three content parts parsed

use std::io::Cursor;
use std::path::Path;

use docweave_ast::{Document, NumberingTable, StyleSheet};

use crate::archive::OoxmlArchive;
use crate::document::parse_document;
use crate::error::Result;
use crate::numbering::parse_numbering;
use crate::styles::parse_styles;

/// Parsed styles, numbering and body of a DOCX file
///
/// Everything is still unresolved; hand the parts to
/// `docweave_core::resolve_document` or use [`DocxPackage::resolve`].
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    /// Style sheet (empty when the package has no styles part)
    pub styles: StyleSheet,
    /// Numbering definitions (empty when the package has no numbering part)
    pub numbering: NumberingTable,
    /// Document body
    pub document: Document,
}

impl DocxPackage {
    /// Open and parse a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening {}", path.display());
        Self::from_archive(&OoxmlArchive::open(path)?)
    }

    /// Parse a DOCX file held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(&OoxmlArchive::from_reader(Cursor::new(bytes))?)
    }

    /// Parse the content parts of an unpacked archive
    pub fn from_archive(archive: &OoxmlArchive) -> Result<Self> {
        let styles = match archive.styles_xml() {
            Some(xml) => parse_styles(xml)?,
            None => {
                log::debug!("No styles part");
                StyleSheet::default()
            }
        };
        let numbering = match archive.numbering_xml() {
            Some(xml) => parse_numbering(xml)?,
            None => NumberingTable::default(),
        };
        let document = parse_document(archive.document_xml()?)?;

        Ok(Self {
            styles,
            numbering,
            document,
        })
    }

    /// Run the property cascade over the document
    pub fn resolve(&self) -> Document {
        docweave_core::resolve_document(self.document.clone(), &self.styles, &self.numbering)
    }
}
