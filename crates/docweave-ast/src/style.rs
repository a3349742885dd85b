//! Named styles, category defaults and document defaults

use serde::{Deserialize, Serialize};

use crate::properties::PropertySet;

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Paragraph style
    #[default]
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleKind {
    /// Parse the `w:type` attribute value
    pub fn parse(s: &str) -> Self {
        match s {
            "character" => StyleKind::Character,
            "table" => StyleKind::Table,
            "numbering" => StyleKind::Numbering,
            _ => StyleKind::Paragraph,
        }
    }

    /// The `w:type` attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKind::Paragraph => "paragraph",
            StyleKind::Character => "character",
            StyleKind::Table => "table",
            StyleKind::Numbering => "numbering",
        }
    }
}

/// A named style definition
///
/// Before style resolution the property sets hold only what the style
/// itself declares. After resolution they hold the full merge of the
/// style over all of its ancestors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDefinition {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name
    pub name: String,
    /// Style type
    #[serde(default)]
    pub kind: StyleKind,
    /// Parent style ID
    #[serde(default, rename = "basedOnId", skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
    /// Paragraph properties
    #[serde(default)]
    pub paragraph_props: PropertySet,
    /// Run properties
    #[serde(default)]
    pub run_props: PropertySet,
}

impl StyleDefinition {
    /// Create a paragraph style whose name equals its id
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Default::default()
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the style type
    pub fn with_kind(mut self, kind: StyleKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the parent style
    pub fn based_on(mut self, id: impl Into<String>) -> Self {
        self.based_on = Some(id.into());
        self
    }

    /// Set the paragraph properties
    pub fn with_paragraph_props(mut self, props: PropertySet) -> Self {
        self.paragraph_props = props;
        self
    }

    /// Set the run properties
    pub fn with_run_props(mut self, props: PropertySet) -> Self {
        self.run_props = props;
        self
    }
}

/// Category default style ids (`w:default="1"` styles)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    /// Default paragraph style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<String>,
    /// Default character style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    /// Default numbering style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numbering: Option<String>,
    /// Default table style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl StyleDefaults {
    /// Record `id` as the default for `kind`
    pub fn set(&mut self, kind: StyleKind, id: impl Into<String>) {
        let id = Some(id.into());
        match kind {
            StyleKind::Paragraph => self.paragraph = id,
            StyleKind::Character => self.character = id,
            StyleKind::Numbering => self.numbering = id,
            StyleKind::Table => self.table = id,
        }
    }
}

/// Lowest-precedence formatting, applied to every paragraph and run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentDefaults {
    /// Default paragraph properties (`w:pPrDefault`)
    pub paragraph_props: PropertySet,
    /// Default run properties (`w:rPrDefault`)
    pub run_props: PropertySet,
}

/// Everything extracted from a styles part
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleSheet {
    /// Style definitions in document order
    pub styles: Vec<StyleDefinition>,
    /// Category default style ids
    pub defaults: StyleDefaults,
    /// Document-wide default formatting
    pub document_defaults: DocumentDefaults,
}

impl StyleSheet {
    /// Create an empty style sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a style by ID
    ///
    /// When several styles share an id the last one wins, matching how the
    /// cascade indexes them.
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.iter().rev().find(|s| s.id == id)
    }

    /// Add a style
    pub fn push(&mut self, style: StyleDefinition) {
        self.styles.push(style);
    }

    /// Builder-style [`push`](Self::push)
    pub fn with_style(mut self, style: StyleDefinition) -> Self {
        self.push(style);
        self
    }

    /// Get all styles of one kind
    pub fn of_kind(&self, kind: StyleKind) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.iter().filter(move |s| s.kind == kind)
    }
}
