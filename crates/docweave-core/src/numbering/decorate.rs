//! Marker decoration strategies
//!
//! The counter state machine is shared; what differs between output
//! formats is how a finished marker string is dressed up. Rich-text
//! output wants a width estimate and a padding hint so the text after the
//! marker lines up with the level's tab stop. Plain-text output just wants
//! a separating space.

use docweave_ast::{Justification, NumFormat, NumberingLevel};
use serde::{Deserialize, Serialize};

use super::numerals::BULLET;

/// Estimated width of an ordinary marker character
pub const CHAR_WIDTH_PT: f64 = 7.2;
/// Estimated width of `.`, `(` and `)`
pub const NARROW_CHAR_WIDTH_PT: f64 = 3.6;
/// Tab stop assumed when the level declares none
pub const DEFAULT_TAB_STOP_PT: f64 = 7.2;
/// Smallest padding ever emitted after a marker
pub const MIN_PADDING_PT: f64 = 7.2;

/// Layout hints for rich-text markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleHints {
    /// Heuristic marker width
    pub marker_width_pt: f64,
    /// Space between the marker and the paragraph text
    pub padding_pt: f64,
    /// Marker alignment
    pub justification: Justification,
    /// Marker font
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// A rendered list marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingMarker {
    /// Marker text
    pub marker: String,
    /// Layout hints (rich text only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_hints: Option<StyleHints>,
}

impl NumberingMarker {
    /// A marker without layout hints
    pub fn plain(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            style_hints: None,
        }
    }
}

/// Turns a formatted marker into renderer output
///
/// `level` is `None` when the list reference did not resolve and the
/// marker is the fallback bullet.
pub trait MarkerDecorator {
    /// Decorate a marker
    fn decorate(&self, marker: String, level: Option<&NumberingLevel>) -> NumberingMarker;
}

/// Computes width and padding hints
#[derive(Debug, Clone, Copy, Default)]
pub struct RichTextDecorator;

/// Appends a single trailing space
///
/// Literal bullet glyphs from private-use symbol fonts (Symbol,
/// Wingdings) mean nothing without the font, so they become `•`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextDecorator;

impl MarkerDecorator for RichTextDecorator {
    fn decorate(&self, marker: String, level: Option<&NumberingLevel>) -> NumberingMarker {
        let Some(level) = level else {
            return NumberingMarker::plain(marker);
        };

        let marker_width_pt = marker_width_pt(&marker);
        let (indent_left_pt, first_line_pt) = level
            .indent_override
            .as_ref()
            .map(|indent| {
                (
                    indent.indent_left_pt().unwrap_or(0.0),
                    indent.first_line_offset_pt(),
                )
            })
            .unwrap_or((0.0, 0.0));
        let tab_stop_pt = level.tab_stop_pt.unwrap_or(DEFAULT_TAB_STOP_PT);
        let padding_pt = (tab_stop_pt - (indent_left_pt + first_line_pt) - marker_width_pt)
            .max(MIN_PADDING_PT);

        NumberingMarker {
            marker,
            style_hints: Some(StyleHints {
                marker_width_pt,
                padding_pt,
                justification: level.justification,
                font_family: level.font_hint.clone(),
            }),
        }
    }
}

impl MarkerDecorator for PlainTextDecorator {
    fn decorate(&self, marker: String, level: Option<&NumberingLevel>) -> NumberingMarker {
        let mut marker = match level {
            Some(level) if is_symbol_font_bullet(level, &marker) => BULLET.to_string(),
            _ => marker,
        };
        marker.push(' ');
        NumberingMarker::plain(marker)
    }
}

/// A bullet level whose literal text uses a private-use code point
fn is_symbol_font_bullet(level: &NumberingLevel, marker: &str) -> bool {
    level.num_fmt == NumFormat::Bullet
        && !level.lvl_text.contains('%')
        && marker.chars().any(is_private_use)
}

fn is_private_use(c: char) -> bool {
    ('\u{E000}'..='\u{F8FF}').contains(&c)
}

/// Heuristic width of a marker string
pub fn marker_width_pt(marker: &str) -> f64 {
    marker
        .chars()
        .map(|c| match c {
            '.' | '(' | ')' => NARROW_CHAR_WIDTH_PT,
            _ => CHAR_WIDTH_PT,
        })
        .sum()
}
