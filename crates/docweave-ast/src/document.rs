//! Document tree: blocks, paragraphs, runs and tables
//!
//! Paragraphs and runs carry their *explicit* formatting when built by the
//! extraction step. The cascade rewrites the same fields in place with the
//! fully-resolved formatting.

use serde::{Deserialize, Serialize};

use crate::numbering::NumberingRef;
use crate::properties::PropertySet;

/// A complete document body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document content blocks
    pub blocks: Vec<Block>,
}

/// Block-level elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// A paragraph
    Paragraph(Paragraph),
    /// A table
    Table(Table),
}

/// A paragraph with its content and formatting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Style ID (references the style sheet)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
    /// Paragraph formatting
    #[serde(default)]
    pub properties: PropertySet,
    /// Text runs
    #[serde(default)]
    pub runs: Vec<Run>,
    /// List membership
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering: Option<NumberingRef>,
}

/// A text run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// Content tokens
    #[serde(default)]
    pub tokens: Vec<RunToken>,
    /// Character style ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
    /// Run formatting; absent rather than empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertySet>,
}

/// Run content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum RunToken {
    /// Literal text
    Text(String),
    /// A tab character
    Tab,
}

/// A table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table style ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
    /// Table rows
    pub rows: Vec<TableRow>,
}

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Cells in this row
    pub cells: Vec<TableCell>,
    /// Whether this is a header row
    #[serde(default)]
    pub is_header: bool,
}

/// A table cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Blocks in this cell
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Builder-style paragraph append
    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.push(Block::Paragraph(paragraph));
        self
    }

    /// Check if the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get all paragraphs in reading order (descending into tables)
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        collect_paragraphs(&self.blocks, &mut out);
        out
    }
}

fn collect_paragraphs<'a>(blocks: &'a [Block], out: &mut Vec<&'a Paragraph>) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => out.push(p),
            Block::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| r.cells.iter()) {
                    collect_paragraphs(&cell.blocks, out);
                }
            }
        }
    }
}

impl Paragraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style
    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    /// Set the explicit properties
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Append a run
    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    /// Attach to a list level
    pub fn numbered(mut self, list_id: impl Into<String>, ilvl: u32) -> Self {
        self.numbering = Some(NumberingRef::new(list_id, ilvl));
        self
    }

    /// Plain text of all runs (tabs as `\t`)
    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }
}

impl Run {
    /// Create a run holding one text token
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            tokens: vec![RunToken::Text(text.into())],
            ..Default::default()
        }
    }

    /// Set the explicit properties
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Set the character style
    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    /// Append a tab token
    pub fn with_tab(mut self) -> Self {
        self.tokens.push(RunToken::Tab);
        self
    }

    /// Plain text of the tokens (tabs as `\t`)
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| match t {
                RunToken::Text(s) => s.as_str(),
                RunToken::Tab => "\t",
            })
            .collect()
    }
}
