//! docweave-ast - Schema types for word-processing documents
//!
//! This crate provides the types shared by every docweave crate:
//!
//! - [`PropertySet`]: an open bag of paragraph or run formatting
//! - [`StyleSheet`]: named styles, category defaults and document defaults
//! - [`NumberingTable`]: list-numbering level definitions keyed by list id
//! - [`Document`]: the block tree of paragraphs, runs and tables
//!
//! The extraction step produces these types with *unresolved* properties;
//! `docweave-core` turns them into a fully-resolved tree.

pub mod document;
pub mod numbering;
pub mod properties;
pub mod style;

pub use document::{Block, Document, Paragraph, Run, RunToken, Table, TableCell, TableRow};
pub use numbering::{
    Justification, NumFormat, NumberingLevel, NumberingRef, NumberingTable, MAX_LEVEL,
};
pub use properties::{keys, PropertySet};
pub use style::{DocumentDefaults, StyleDefaults, StyleDefinition, StyleKind, StyleSheet};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
