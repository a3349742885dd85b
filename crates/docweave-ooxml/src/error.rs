//! Error types for DOCX extraction

use thiserror::Error;

/// Errors that can occur while reading a DOCX package
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required part not found in archive
    #[error("Required file not found: {0}")]
    MissingFile(String),

    /// Invalid attribute value
    #[error("Invalid value '{value}' for {attribute}")]
    InvalidValue {
        /// Qualified attribute name
        attribute: String,
        /// Offending value
        value: String,
    },

    /// JSON conversion of extracted definitions failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for DOCX extraction
pub type Result<T> = std::result::Result<T, OoxmlError>;
