//! Based-on resolution
//!
//! Every style is flattened into a self-contained property set: its own
//! properties merged over the properties of every ancestor on its
//! `basedOn` chain. Chains are walked independently per style and only
//! ever read the *raw* (unresolved) properties, so the order in which
//! styles are resolved does not matter.

use std::collections::{HashMap, HashSet};

use docweave_ast::{PropertySet, StyleDefinition};

use crate::diagnostics::{Diagnostic, BASED_ON_CYCLE, UNRESOLVED_STYLE};
use crate::merge::{base_preserves_merge, base_preserves_paragraph_merge};

/// Result of resolving a style list
#[derive(Debug, Clone, Default)]
pub struct StyleResolution {
    /// Styles with fully-merged properties, in input order
    pub styles: Vec<StyleDefinition>,
    /// Broken references and cycles met on the way
    pub diagnostics: Vec<Diagnostic>,
}

/// Flatten every style's `basedOn` chain
///
/// # Example
///
/// ```
/// use docweave_ast::{PropertySet, StyleDefinition};
/// use docweave_core::resolve_styles;
///
/// let styles = vec![
///     StyleDefinition::new("Normal")
///         .with_run_props(PropertySet::new().with("fontSizePt", 11)),
///     StyleDefinition::new("Heading1")
///         .based_on("Normal")
///         .with_run_props(PropertySet::new().with("bold", true)),
/// ];
///
/// let resolved = resolve_styles(styles);
/// assert_eq!(resolved[1].run_props.bool("bold"), Some(true));
/// assert_eq!(resolved[1].run_props.font_size_pt(), Some(11.0));
/// ```
pub fn resolve_styles(styles: Vec<StyleDefinition>) -> Vec<StyleDefinition> {
    resolve_styles_with_diagnostics(styles).styles
}

/// Flatten every style's `basedOn` chain, reporting what could not be followed
pub fn resolve_styles_with_diagnostics(mut styles: Vec<StyleDefinition>) -> StyleResolution {
    let raw = RawIndex::new(&styles);
    let mut diagnostics = Vec::new();

    let resolved: Vec<(PropertySet, PropertySet)> = styles
        .iter()
        .map(|style| raw.flatten(style, &mut diagnostics))
        .collect();

    for (style, (paragraph_props, run_props)) in styles.iter_mut().zip(resolved) {
        style.paragraph_props = paragraph_props;
        style.run_props = run_props;
    }

    log::debug!(
        "Resolved {} styles ({} diagnostics)",
        styles.len(),
        diagnostics.len()
    );

    StyleResolution {
        styles,
        diagnostics,
    }
}

/// Snapshot of the unresolved styles, keyed by id (last definition wins)
struct RawIndex<'a> {
    by_id: HashMap<&'a str, &'a StyleDefinition>,
}

impl<'a> RawIndex<'a> {
    fn new(styles: &'a [StyleDefinition]) -> Self {
        Self {
            by_id: styles.iter().map(|s| (s.id.as_str(), s)).collect(),
        }
    }

    /// Collect the chain starting at `style`, nearest first
    fn chain(
        &self,
        style: &'a StyleDefinition,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<&'a StyleDefinition> {
        let mut chain = vec![style];
        let mut visited: HashSet<&str> = HashSet::from([style.id.as_str()]);
        let mut next = style.based_on.as_deref();

        while let Some(base_id) = next {
            if !visited.insert(base_id) {
                log::warn!("Style '{}': basedOn cycle at '{}'", style.id, base_id);
                diagnostics.push(Diagnostic::warning(
                    BASED_ON_CYCLE,
                    format!(
                        "style '{}' has a basedOn cycle through '{}'",
                        style.id, base_id
                    ),
                ));
                break;
            }
            let Some(&base) = self.by_id.get(base_id) else {
                log::warn!("Style '{}': basedOn '{}' not found", style.id, base_id);
                diagnostics.push(Diagnostic::warning(
                    UNRESOLVED_STYLE,
                    format!("style '{}' is based on unknown style '{}'", style.id, base_id),
                ));
                break;
            };
            chain.push(base);
            next = base.based_on.as_deref();
        }

        chain
    }

    /// Fold the chain from the root ancestor down to `style`
    fn flatten(
        &self,
        style: &'a StyleDefinition,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (PropertySet, PropertySet) {
        let chain = self.chain(style, diagnostics);
        let mut ancestors = chain.iter().rev();

        let Some(root) = ancestors.next() else {
            return (style.paragraph_props.clone(), style.run_props.clone());
        };
        let mut paragraph_props = root.paragraph_props.clone();
        let mut run_props = root.run_props.clone();

        for derived in ancestors {
            paragraph_props =
                base_preserves_paragraph_merge(&paragraph_props, &derived.paragraph_props);
            run_props = base_preserves_merge(&run_props, &derived.run_props);
        }

        (paragraph_props, run_props)
    }
}
