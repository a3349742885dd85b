//! List-numbering definitions
//!
//! A [`NumberingTable`] maps a list id to the ordered level definitions
//! of that list. Paragraphs point into it with a [`NumberingRef`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::properties::PropertySet;

/// Deepest list level (levels are 0..=8)
pub const MAX_LEVEL: u8 = 8;

/// Numeral scheme of a level (`w:numFmt`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NumFormat {
    /// 1, 2, 3
    #[default]
    Decimal,
    /// I, II, III
    UpperRoman,
    /// i, ii, iii
    LowerRoman,
    /// A, B, C
    UpperLetter,
    /// a, b, c
    LowerLetter,
    /// Fixed bullet glyph
    Bullet,
    /// Any other scheme, kept verbatim
    Other(String),
}

impl NumFormat {
    /// Parse from the `w:val` attribute
    pub fn parse(s: &str) -> Self {
        match s {
            "decimal" => Self::Decimal,
            "upperRoman" => Self::UpperRoman,
            "lowerRoman" => Self::LowerRoman,
            "upperLetter" => Self::UpperLetter,
            "lowerLetter" => Self::LowerLetter,
            "bullet" => Self::Bullet,
            other => Self::Other(other.to_string()),
        }
    }

    /// The `w:val` spelling of this format
    pub fn as_str(&self) -> &str {
        match self {
            Self::Decimal => "decimal",
            Self::UpperRoman => "upperRoman",
            Self::LowerRoman => "lowerRoman",
            Self::UpperLetter => "upperLetter",
            Self::LowerLetter => "lowerLetter",
            Self::Bullet => "bullet",
            Self::Other(s) => s,
        }
    }

    /// Check if this format produces a counter value (not a bullet)
    pub fn is_numbered(&self) -> bool {
        matches!(
            self,
            Self::Decimal
                | Self::UpperRoman
                | Self::LowerRoman
                | Self::UpperLetter
                | Self::LowerLetter
        )
    }
}

impl fmt::Display for NumFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for NumFormat {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<NumFormat> for String {
    fn from(format: NumFormat) -> Self {
        format.as_str().to_string()
    }
}

/// Horizontal alignment of a marker (`w:lvlJc`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    /// Left / start
    #[default]
    Left,
    /// Centered
    Center,
    /// Right / end
    Right,
}

impl Justification {
    /// Parse from the `w:val` attribute
    pub fn parse(s: &str) -> Self {
        match s {
            "center" => Self::Center,
            "right" | "end" => Self::Right,
            _ => Self::Left,
        }
    }

    /// Serialized spelling, also usable as a CSS `text-align` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// One level of a list definition (`w:lvl`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingLevel {
    /// Level index (0-8)
    pub ilvl: u8,
    /// Starting value
    pub start: u32,
    /// Numeral scheme
    pub num_fmt: NumFormat,
    /// Marker template with `%1`..`%9` placeholders
    pub lvl_text: String,
    /// Marker alignment
    #[serde(default)]
    pub justification: Justification,
    /// Indentation applied to paragraphs at this level
    ///
    /// Holds a property set with a single `indent` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_override: Option<PropertySet>,
    /// Tab stop following the marker, in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_stop_pt: Option<f64>,
    /// Font family for the marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_hint: Option<String>,
}

impl NumberingLevel {
    /// Create a level starting at 1
    pub fn new(ilvl: u8, num_fmt: NumFormat, lvl_text: impl Into<String>) -> Self {
        Self {
            ilvl: ilvl.min(MAX_LEVEL),
            start: 1,
            num_fmt,
            lvl_text: lvl_text.into(),
            justification: Justification::Left,
            indent_override: None,
            tab_stop_pt: None,
            font_hint: None,
        }
    }

    /// Set the starting value
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    /// Set the marker alignment
    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = justification;
        self
    }

    /// Set the indentation override
    pub fn with_indent_override(mut self, indent: PropertySet) -> Self {
        self.indent_override = Some(indent);
        self
    }

    /// Set the tab stop
    pub fn with_tab_stop(mut self, tab_stop_pt: f64) -> Self {
        self.tab_stop_pt = Some(tab_stop_pt);
        self
    }

    /// Set the marker font
    pub fn with_font_hint(mut self, font: impl Into<String>) -> Self {
        self.font_hint = Some(font.into());
        self
    }
}

/// Reference from a paragraph to a list level (`w:numPr`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingRef {
    /// List id (`w:numId`)
    pub list_id: String,
    /// Level as written in the source, possibly out of range
    pub ilvl: u32,
}

impl NumberingRef {
    /// Create a reference
    pub fn new(list_id: impl Into<String>, ilvl: u32) -> Self {
        Self {
            list_id: list_id.into(),
            ilvl,
        }
    }

    /// Level clamped to 0..=8
    pub fn level(&self) -> u8 {
        self.ilvl.min(u32::from(MAX_LEVEL)) as u8
    }
}

/// List definitions keyed by list id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberingTable {
    lists: BTreeMap<String, Vec<NumberingLevel>>,
}

impl NumberingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the levels of a list, replacing any previous definition
    pub fn insert(&mut self, list_id: impl Into<String>, levels: Vec<NumberingLevel>) {
        self.lists.insert(list_id.into(), levels);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_list(mut self, list_id: impl Into<String>, levels: Vec<NumberingLevel>) -> Self {
        self.insert(list_id, levels);
        self
    }

    /// All levels of a list
    pub fn levels(&self, list_id: &str) -> Option<&[NumberingLevel]> {
        self.lists.get(list_id).map(Vec::as_slice)
    }

    /// Find the level whose own `ilvl` matches
    pub fn level(&self, list_id: &str, ilvl: u8) -> Option<&NumberingLevel> {
        self.lists
            .get(list_id)?
            .iter()
            .find(|level| level.ilvl == ilvl)
    }

    /// Resolve a paragraph reference (with clamping)
    pub fn lookup(&self, numbering: &NumberingRef) -> Option<&NumberingLevel> {
        self.level(&numbering.list_id, numbering.level())
    }

    /// Iterate over list ids
    pub fn list_ids(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Number of lists
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Check if the table holds no lists
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
