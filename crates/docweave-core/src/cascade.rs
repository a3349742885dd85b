//! Property cascade
//!
//! Produces the final formatting of every paragraph and run by layering,
//! from most to least specific (each lower layer only fills fields the
//! layers above left undefined):
//!
//! | Paragraph                                 | Run                                         |
//! |-------------------------------------------|---------------------------------------------|
//! | explicit paragraph properties             | explicit run properties                     |
//! | numbering level `indent` (numbered only)  | character style (`run.styleId` or default)  |
//! | paragraph style, or default paragraph style | paragraph style `runProps` (or default's) |
//! | document defaults                         | document defaults                           |
//!
//! A run that ends up with no properties at all keeps `properties: None`.

use std::collections::{HashMap, HashSet};

use docweave_ast::{
    Block, Document, DocumentDefaults, NumberingTable, Paragraph, PropertySet, Run,
    StyleDefaults, StyleDefinition, StyleSheet,
};

use crate::diagnostics::{Diagnostic, UNRESOLVED_STYLE};
use crate::merge::{
    base_preserves_merge, base_preserves_paragraph_merge, override_merge, override_paragraph_merge,
};
use crate::resolve::resolve_styles_with_diagnostics;

/// Cascade engine holding the resolved styles of one style sheet
///
/// # Example
///
/// ```
/// use docweave_ast::{Document, NumberingTable, Paragraph, PropertySet, Run, StyleDefinition, StyleSheet};
/// use docweave_core::CascadeEngine;
///
/// let sheet = StyleSheet::new().with_style(
///     StyleDefinition::new("Strong").with_run_props(PropertySet::new().with("bold", true)),
/// );
/// let doc = Document::new().with_paragraph(
///     Paragraph::new().with_style("Strong").with_run(Run::from_text("Hi")),
/// );
///
/// let mut engine = CascadeEngine::new(&sheet);
/// let resolved = engine.resolve_document(doc, &NumberingTable::new());
/// let run = &resolved.paragraphs()[0].runs[0];
/// assert_eq!(run.properties.as_ref().unwrap().bool("bold"), Some(true));
/// ```
#[derive(Debug, Clone)]
pub struct CascadeEngine {
    styles: HashMap<String, StyleDefinition>,
    defaults: StyleDefaults,
    document_defaults: DocumentDefaults,
    diagnostics: Vec<Diagnostic>,
    reported: HashSet<String>,
}

impl CascadeEngine {
    /// Resolve the style sheet's basedOn chains and build an engine
    pub fn new(sheet: &StyleSheet) -> Self {
        let resolution = resolve_styles_with_diagnostics(sheet.styles.clone());
        let styles = resolution
            .styles
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        Self {
            styles,
            defaults: sheet.defaults.clone(),
            document_defaults: sheet.document_defaults.clone(),
            diagnostics: resolution.diagnostics,
            reported: HashSet::new(),
        }
    }

    /// Override the document defaults with caller-supplied values
    ///
    /// The overrides win every conflict (see [`override_merge`]).
    pub fn with_default_overrides(mut self, paragraph: &PropertySet, run: &PropertySet) -> Self {
        self.document_defaults.paragraph_props =
            override_paragraph_merge(&self.document_defaults.paragraph_props, paragraph);
        self.document_defaults.run_props = override_merge(&self.document_defaults.run_props, run);
        self
    }

    /// Get a resolved style
    pub fn style(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id)
    }

    /// Effective document defaults
    pub fn document_defaults(&self) -> &DocumentDefaults {
        &self.document_defaults
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take the collected diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Resolve every paragraph and run of a document
    pub fn resolve_document(&mut self, mut document: Document, numbering: &NumberingTable) -> Document {
        self.resolve_blocks(&mut document.blocks, numbering);
        document
    }

    fn resolve_blocks(&mut self, blocks: &mut [Block], numbering: &NumberingTable) {
        for block in blocks {
            match block {
                Block::Paragraph(paragraph) => self.resolve_paragraph(paragraph, numbering),
                Block::Table(table) => {
                    for cell in table.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
                        self.resolve_blocks(&mut cell.blocks, numbering);
                    }
                }
            }
        }
    }

    /// Resolve one paragraph and its runs in place
    pub fn resolve_paragraph(&mut self, paragraph: &mut Paragraph, numbering: &NumberingTable) {
        if let Some(id) = paragraph.style_id.as_deref() {
            self.report_if_missing(id);
        }
        let style = match paragraph.style_id.as_deref() {
            Some(id) => self.styles.get(id),
            None => self.default_style(self.defaults.paragraph.as_deref()),
        };

        let mut props = std::mem::take(&mut paragraph.properties);
        if let Some(indent) = paragraph
            .numbering
            .as_ref()
            .and_then(|r| numbering.lookup(r))
            .and_then(|level| level.indent_override.as_ref())
            .and_then(PropertySet::indent_only)
        {
            props = base_preserves_paragraph_merge(&indent, &props);
        }
        if let Some(style) = style {
            props = base_preserves_paragraph_merge(&style.paragraph_props, &props);
        }
        paragraph.properties =
            base_preserves_paragraph_merge(&self.document_defaults.paragraph_props, &props);

        let style_run_props = style.map(|s| s.run_props.clone());
        for run in &mut paragraph.runs {
            self.resolve_run(run, style_run_props.as_ref());
        }
    }

    fn resolve_run(&mut self, run: &mut Run, paragraph_run_props: Option<&PropertySet>) {
        if let Some(id) = run.style_id.as_deref() {
            self.report_if_missing(id);
        }
        let character_style = match run.style_id.as_deref() {
            Some(id) => self.styles.get(id),
            None => self.default_style(self.defaults.character.as_deref()),
        };

        let mut props = run.properties.take().unwrap_or_default();
        if let Some(style) = character_style {
            props = base_preserves_merge(&style.run_props, &props);
        }
        if let Some(style_props) = paragraph_run_props {
            props = base_preserves_merge(style_props, &props);
        }
        props = base_preserves_merge(&self.document_defaults.run_props, &props);

        run.properties = (!props.is_empty()).then_some(props);
    }

    fn default_style(&self, id: Option<&str>) -> Option<&StyleDefinition> {
        id.and_then(|id| self.styles.get(id))
    }

    fn report_if_missing(&mut self, id: &str) {
        if self.styles.contains_key(id) || !self.reported.insert(id.to_string()) {
            return;
        }
        log::warn!("Style '{}' referenced but not defined", id);
        self.diagnostics.push(Diagnostic::warning(
            UNRESOLVED_STYLE,
            format!("style '{}' is referenced but not defined", id),
        ));
    }
}

/// Resolve a document against a style sheet and numbering table
///
/// This is the one-shot entry point; use [`CascadeEngine`] directly to
/// reuse resolved styles or to inspect diagnostics.
pub fn resolve_document(
    document: Document,
    sheet: &StyleSheet,
    numbering: &NumberingTable,
) -> Document {
    CascadeEngine::new(sheet).resolve_document(document, numbering)
}
