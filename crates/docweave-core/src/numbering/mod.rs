//! List-numbering state machine
//!
//! A [`NumberingContext`] owns the counters of one render pass. Every
//! numbered paragraph met during the pass advances the counters of its
//! list and gets a marker back:
//!
//! 1. `counters[list][ilvl] += 1`
//! 2. every deeper level of the same list is reset to 0
//! 3. the level's `lvlText` template has its `%1`..`%N` placeholders
//!    (`N = ilvl + 1`) replaced by the counters, formatted with the
//!    matched level's `numFmt`
//! 4. the marker is handed to a [`MarkerDecorator`]
//!
//! A reference with no matching level yields the fallback bullet and does
//! not touch any counter.
//!
//! Placeholders for shallower levels use the *current* level's numeral
//! scheme, not their own. Word renders `%1.%2` under a lower-letter level
//! as "1.a"; this engine renders it as "a.a". This is the established
//! behaviour of the converter and is kept until a product decision says
//! otherwise (see `tests/numbering.rs`).

mod decorate;
mod numerals;

use std::collections::HashMap;

use docweave_ast::{NumFormat, NumberingRef, NumberingTable, MAX_LEVEL};
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, MISSING_NUMBERING_LEVEL};

pub use decorate::{
    marker_width_pt, MarkerDecorator, NumberingMarker, PlainTextDecorator, RichTextDecorator,
    StyleHints, CHAR_WIDTH_PT, DEFAULT_TAB_STOP_PT, MIN_PADDING_PT, NARROW_CHAR_WIDTH_PT,
};
pub use numerals::{format_counter, to_letter, to_roman, BULLET};

/// Number of counter slots per list
pub const LEVELS: usize = MAX_LEVEL as usize + 1;

/// Output flavour of a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    /// Markers with width and padding hints
    #[default]
    RichText,
    /// Markers followed by a space
    PlainText,
}

impl RenderMode {
    /// The decoration strategy for this mode
    pub fn decorator(self) -> &'static dyn MarkerDecorator {
        match self {
            RenderMode::RichText => &RichTextDecorator,
            RenderMode::PlainText => &PlainTextDecorator,
        }
    }
}

/// Counter state of one render pass
///
/// Create one per render call; never share it between documents.
///
/// # Example
///
/// ```
/// use docweave_ast::{NumFormat, NumberingLevel, NumberingRef, NumberingTable};
/// use docweave_core::numbering::{NumberingContext, RenderMode};
///
/// let table = NumberingTable::new()
///     .with_list("1", vec![NumberingLevel::new(0, NumFormat::UpperRoman, "%1.")]);
/// let item = NumberingRef::new("1", 0);
///
/// let mut ctx = NumberingContext::new();
/// assert_eq!(ctx.format(&item, &table, RenderMode::PlainText).marker, "I. ");
/// assert_eq!(ctx.format(&item, &table, RenderMode::PlainText).marker, "II. ");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumberingContext {
    counters: HashMap<String, [u32; LEVELS]>,
    diagnostics: Vec<Diagnostic>,
}

impl NumberingContext {
    /// Create a context with no counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counters for `numbering` and produce its marker
    pub fn format(
        &mut self,
        numbering: &NumberingRef,
        table: &NumberingTable,
        mode: RenderMode,
    ) -> NumberingMarker {
        self.format_with(numbering, table, mode.decorator())
    }

    /// Like [`format`](Self::format) with a custom decoration strategy
    pub fn format_with(
        &mut self,
        numbering: &NumberingRef,
        table: &NumberingTable,
        decorator: &dyn MarkerDecorator,
    ) -> NumberingMarker {
        let ilvl = numbering.level();
        let Some(level) = table.level(&numbering.list_id, ilvl) else {
            log::warn!(
                "No numbering level {} for list '{}', using bullet",
                ilvl,
                numbering.list_id
            );
            self.diagnostics.push(Diagnostic::warning(
                MISSING_NUMBERING_LEVEL,
                format!(
                    "list '{}' has no level {}; rendered as a bullet",
                    numbering.list_id, ilvl
                ),
            ));
            return decorator.decorate(BULLET.to_string(), None);
        };

        let counters = self.advance(&numbering.list_id, ilvl);
        let marker = substitute_template(&level.lvl_text, &counters, ilvl, &level.num_fmt);
        decorator.decorate(marker, Some(level))
    }

    /// Apply one occurrence of `(list_id, ilvl)` to the counters
    ///
    /// Returns a copy of the list's counters after the transition.
    pub fn advance(&mut self, list_id: &str, ilvl: u8) -> [u32; LEVELS] {
        let ilvl = usize::from(ilvl.min(MAX_LEVEL));
        let counters = self
            .counters
            .entry(list_id.to_string())
            .or_insert([0; LEVELS]);

        counters[ilvl] = counters[ilvl].saturating_add(1);
        for deeper in &mut counters[ilvl + 1..] {
            *deeper = 0;
        }
        *counters
    }

    /// Current counters of a list, if it has been seen
    pub fn counters(&self, list_id: &str) -> Option<&[u32; LEVELS]> {
        self.counters.get(list_id)
    }

    /// Forget all counters and diagnostics
    pub fn reset(&mut self) {
        self.counters.clear();
        self.diagnostics.clear();
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take the collected diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// Format one numbered paragraph against a caller-owned context
pub fn format_numbering(
    ctx: &mut NumberingContext,
    numbering: &NumberingRef,
    table: &NumberingTable,
    mode: RenderMode,
) -> NumberingMarker {
    ctx.format(numbering, table, mode)
}

/// Replace `%1`..`%N` (`N = ilvl + 1`) with formatted counters
///
/// Placeholders above `N` are left as written.
pub fn substitute_template(
    template: &str,
    counters: &[u32; LEVELS],
    ilvl: u8,
    format: &NumFormat,
) -> String {
    let mut out = template.to_string();
    for level in 0..=usize::from(ilvl.min(MAX_LEVEL)) {
        let placeholder = format!("%{}", level + 1);
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &format_counter(counters[level], format));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docweave_ast::NumberingLevel;

    fn outline() -> NumberingTable {
        NumberingTable::new().with_list(
            "1",
            vec![
                NumberingLevel::new(0, NumFormat::Decimal, "%1."),
                NumberingLevel::new(1, NumFormat::LowerLetter, "%2)"),
                NumberingLevel::new(2, NumFormat::Decimal, "%1.%2.%3"),
            ],
        )
    }

    fn markers(ctx: &mut NumberingContext, table: &NumberingTable, refs: &[(&str, u32)]) -> Vec<String> {
        refs.iter()
            .map(|(list, ilvl)| {
                ctx.format(&NumberingRef::new(*list, *ilvl), table, RenderMode::RichText)
                    .marker
            })
            .collect()
    }

    #[test]
    fn test_advance_resets_deeper_levels() {
        let mut ctx = NumberingContext::new();
        ctx.advance("a", 0);
        ctx.advance("a", 1);
        ctx.advance("a", 2);
        let after = ctx.advance("a", 0);
        assert_eq!(&after[..3], &[2, 0, 0]);
    }

    #[test]
    fn test_advance_clamps_level() {
        let mut ctx = NumberingContext::new();
        let counters = ctx.advance("a", 200);
        assert_eq!(counters[8], 1);
    }

    #[test]
    fn test_substitute_only_up_to_current_level() {
        let counters = [3, 2, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            substitute_template("%1.%2.%3", &counters, 1, &NumFormat::Decimal),
            "3.2.%3"
        );
    }

    #[test]
    fn test_template_without_placeholder_is_literal() {
        let counters = [1; LEVELS];
        assert_eq!(
            substitute_template("o", &counters, 0, &NumFormat::Bullet),
            "o"
        );
    }

    #[test]
    fn test_hierarchical_template_uses_current_level_format() {
        let mut ctx = NumberingContext::new();
        let table = outline();
        let out = markers(&mut ctx, &table, &[("1", 0), ("1", 0), ("1", 1), ("1", 2)]);
        assert_eq!(out, vec!["1.", "2.", "a)", "2.1.1"]);
    }

    #[test]
    fn test_unknown_level_is_bullet_and_keeps_counters() {
        let mut ctx = NumberingContext::new();
        let table = outline();
        let out = markers(&mut ctx, &table, &[("1", 0), ("1", 5), ("1", 0)]);
        assert_eq!(out, vec!["1.", BULLET, "2."]);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].code, MISSING_NUMBERING_LEVEL);
    }

    #[test]
    fn test_unknown_list_creates_no_counters() {
        let mut ctx = NumberingContext::new();
        let out = ctx.format(&NumberingRef::new("404", 0), &outline(), RenderMode::PlainText);
        assert_eq!(out.marker, format!("{} ", BULLET));
        assert!(ctx.counters("404").is_none());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut ctx = NumberingContext::new();
        let table = outline();
        markers(&mut ctx, &table, &[("1", 0), ("1", 0)]);
        ctx.reset();
        assert_eq!(markers(&mut ctx, &table, &[("1", 0)]), vec!["1."]);
    }

    #[test]
    fn test_format_numbering_free_function() {
        let mut ctx = NumberingContext::new();
        let table = outline();
        let item = NumberingRef::new("1", 0);
        let first = format_numbering(&mut ctx, &item, &table, RenderMode::RichText);
        assert_eq!(first.marker, "1.");
        assert!(first.style_hints.is_some());
    }
}
