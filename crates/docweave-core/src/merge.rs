//! Deep-merge primitives over property sets
//!
//! There are two strategies and they are deliberately separate functions.
//! Picking the wrong one inverts cascade precedence.
//!
//! - [`override_merge`]: the child always wins. Objects merge
//!   recursively, everything else (arrays, scalars, `null`) replaces.
//! - [`base_preserves_merge`]: the derived side wins only where it
//!   defines a value. A missing key falls back to the base. An explicit
//!   `null` in the derived side is kept as an intentional empty value.
//!
//! Paragraph layering goes through [`base_preserves_paragraph_merge`] and
//! [`override_paragraph_merge`], which treat the first-line offset pair
//! as one value.

use docweave_ast::PropertySet;
use serde_json::map::Entry;
use serde_json::{Map, Value};

/// Merge `child` over `base`, the child winning every conflict
///
/// # Example
///
/// ```
/// use docweave_ast::PropertySet;
/// use docweave_core::merge::override_merge;
/// use serde_json::Value;
///
/// let base = PropertySet::new().with("bold", true).with("color", "FF0000");
/// let child = PropertySet::new().with("color", Value::Null);
///
/// let merged = override_merge(&base, &child);
/// assert_eq!(merged.get("color"), Some(&Value::Null));
/// assert_eq!(merged.bool("bold"), Some(true));
/// ```
pub fn override_merge(base: &PropertySet, child: &PropertySet) -> PropertySet {
    let mut out = base.as_map().clone();
    override_into(&mut out, child.as_map());
    out.into()
}

fn override_into(target: &mut Map<String, Value>, child: &Map<String, Value>) {
    for (key, value) in child {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (target.get_mut(key), value)
        {
            override_into(existing, incoming);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Merge `derived` over `base`, the base filling only undefined fields
///
/// # Example
///
/// ```
/// use docweave_ast::PropertySet;
/// use docweave_core::merge::base_preserves_merge;
///
/// let base = PropertySet::new()
///     .with_path(&["indent", "leftPt"], 36.0)
///     .with_path(&["indent", "firstLinePt"], 10.0);
/// let derived = PropertySet::new().with_path(&["indent", "firstLinePt"], 5.0);
///
/// let merged = base_preserves_merge(&base, &derived);
/// assert_eq!(merged.indent_left_pt(), Some(36.0));
/// assert_eq!(merged.first_line_pt(), Some(5.0));
/// ```
pub fn base_preserves_merge(base: &PropertySet, derived: &PropertySet) -> PropertySet {
    let mut out = derived.as_map().clone();
    fill_undefined(&mut out, base.as_map());
    out.into()
}

fn fill_undefined(target: &mut Map<String, Value>, base: &Map<String, Value>) {
    for (key, value) in base {
        match target.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
            Entry::Occupied(mut slot) => {
                // Null and scalars are defined values and stay as they are
                if let (Value::Object(existing), Value::Object(inherited)) = (slot.get_mut(), value)
                {
                    fill_undefined(existing, inherited);
                }
            }
        }
    }
}

/// [`base_preserves_merge`] for paragraph properties
///
/// `indent.firstLinePt` and `indent.hangingPt` are a single value: when
/// `derived` sets either one, neither is inherited from `base`.
pub fn base_preserves_paragraph_merge(base: &PropertySet, derived: &PropertySet) -> PropertySet {
    if derived.defines_first_line_offset() {
        base_preserves_merge(&base.without_first_line_offset(), derived)
    } else {
        base_preserves_merge(base, derived)
    }
}

/// [`override_merge`] for paragraph properties
///
/// When `child` sets `indent.firstLinePt` or `indent.hangingPt`, the base's
/// first-line offset is dropped before merging.
pub fn override_paragraph_merge(base: &PropertySet, child: &PropertySet) -> PropertySet {
    if child.defines_first_line_offset() {
        override_merge(&base.without_first_line_offset(), child)
    } else {
        override_merge(base, child)
    }
}
