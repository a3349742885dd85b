//! # docweave-ooxml
//!
//! DOCX extraction for docweave.
//!
//! This crate reads a DOCX archive and turns its three content parts into
//! the unresolved schema types of `docweave-ast`:
//! - `word/styles.xml` into a [`StyleSheet`](docweave_ast::StyleSheet)
//! - `word/numbering.xml` into a [`NumberingTable`](docweave_ast::NumberingTable)
//! - `word/document.xml` into a [`Document`](docweave_ast::Document)
//!
//! ## Example
//!
//! ```no_run
//! use docweave_ooxml::DocxPackage;
//!
//! let package = DocxPackage::open("report.docx")?;
//! let resolved = package.resolve();
//!
//! for paragraph in resolved.paragraphs() {
//!     println!("{}", paragraph.text());
//! }
//! # Ok::<(), docweave_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod numbering;
pub mod package;
pub mod properties;
pub mod styles;
pub mod test_utils;

pub use archive::OoxmlArchive;
pub use document::parse_document;
pub use error::{OoxmlError, Result};
pub use numbering::parse_numbering;
pub use package::DocxPackage;
pub use styles::parse_styles;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
