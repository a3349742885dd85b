//! Archive handling for DOCX files
//!
//! A DOCX file is a ZIP archive of XML parts. Only the parts the
//! extraction step reads are exposed.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use zip::read::ZipArchive;

use crate::error::{OoxmlError, Result};

/// Main document part
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Styles part
pub const STYLES_PART: &str = "word/styles.xml";
/// Numbering part
pub const NUMBERING_PART: &str = "word/numbering.xml";

/// An unpacked DOCX archive
#[derive(Debug)]
pub struct OoxmlArchive {
    /// All files in the archive, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        log::debug!("Unpacked {} archive entries", files.len());
        Ok(Self { files })
    }

    /// Get a file's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get the main document content (word/document.xml)
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.get(DOCUMENT_PART)
            .ok_or_else(|| OoxmlError::MissingFile(DOCUMENT_PART.to_string()))
    }

    /// Get the styles definition (word/styles.xml), if present
    pub fn styles_xml(&self) -> Option<&[u8]> {
        self.get(STYLES_PART)
    }

    /// Get the numbering definitions (word/numbering.xml), if present
    pub fn numbering_xml(&self) -> Option<&[u8]> {
        self.get(NUMBERING_PART)
    }

    /// Check if a file exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// List all files in the archive
    pub fn file_list(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::DocxBuilder;
    use std::io::Cursor;

    #[test]
    fn test_from_reader() {
        let bytes = DocxBuilder::new()
            .body(r#"<w:p><w:r><w:t>Hello</w:t></w:r></w:p>"#)
            .build()
            .unwrap();
        let archive = OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap();

        assert!(archive.contains(DOCUMENT_PART));
        assert!(archive.document_xml().is_ok());
        assert!(archive.styles_xml().is_none());
        assert!(archive.numbering_xml().is_none());
    }

    #[test]
    fn test_missing_document_part() {
        let bytes = DocxBuilder::new().without_document().build().unwrap();
        let archive = OoxmlArchive::from_reader(Cursor::new(bytes)).unwrap();

        assert!(matches!(
            archive.document_xml(),
            Err(OoxmlError::MissingFile(path)) if path == DOCUMENT_PART
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let result = OoxmlArchive::from_reader(Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(OoxmlError::Archive(_))));
    }

    #[test]
    fn test_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.docx");
        std::fs::write(&path, DocxBuilder::new().build().unwrap()).unwrap();

        let archive = OoxmlArchive::open(&path).unwrap();
        assert!(archive.file_list().any(|f| f == "[Content_Types].xml"));
    }
}
