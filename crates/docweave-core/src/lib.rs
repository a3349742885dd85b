//! docweave-core - Style cascade and list numbering
//!
//! Turns the *unresolved* tree produced by extraction into the formatting a
//! renderer can use directly.
//!
//! - [`merge`]: the two deep-merge strategies
//! - [`resolve`]: flattening of `basedOn` chains
//! - [`cascade`]: per-paragraph and per-run property layering
//! - [`numbering`]: list counters and marker decoration
//!
//! # Example
//!
//! ```
//! use docweave_ast::{keys, Document, NumFormat, NumberingLevel, NumberingTable};
//! use docweave_ast::{Paragraph, PropertySet, Run, StyleDefinition, StyleSheet};
//! use docweave_core::{resolve_document, NumberingContext, RenderMode};
//!
//! let sheet = StyleSheet::new().with_style(
//!     StyleDefinition::new("ListParagraph")
//!         .with_run_props(PropertySet::new().with(keys::FONT_SIZE_PT, 11)),
//! );
//! let numbering = NumberingTable::new()
//!     .with_list("1", vec![NumberingLevel::new(0, NumFormat::Decimal, "%1.")]);
//! let doc = Document::new().with_paragraph(
//!     Paragraph::new()
//!         .with_style("ListParagraph")
//!         .numbered("1", 0)
//!         .with_run(Run::from_text("First")),
//! );
//!
//! let resolved = resolve_document(doc, &sheet, &numbering);
//! let paragraph = resolved.paragraphs()[0];
//! let run_props = paragraph.runs[0].properties.as_ref().unwrap();
//! assert_eq!(run_props.font_size_pt(), Some(11.0));
//!
//! let mut ctx = NumberingContext::new();
//! let marker = ctx.format(
//!     paragraph.numbering.as_ref().unwrap(),
//!     &numbering,
//!     RenderMode::PlainText,
//! );
//! assert_eq!(marker.marker, "1. ");
//! ```

pub mod cascade;
pub mod diagnostics;
pub mod merge;
pub mod numbering;
pub mod resolve;

pub use cascade::{resolve_document, CascadeEngine};
pub use diagnostics::{Diagnostic, Severity};
pub use merge::{
    base_preserves_merge, base_preserves_paragraph_merge, override_merge, override_paragraph_merge,
};
pub use numbering::{
    format_numbering, MarkerDecorator, NumberingContext, NumberingMarker, RenderMode, StyleHints,
};
pub use resolve::{resolve_styles, resolve_styles_with_diagnostics, StyleResolution};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
