//! Formatting property sets
//!
//! Paragraph and run formatting is kept as an open JSON-like object rather
//! than a closed struct. The cascade needs to tell three states apart for
//! every field:
//!
//! - the key is missing (undefined, a lower layer may fill it)
//! - the key holds `null` (an intentional empty value)
//! - the key holds a value
//!
//! Nested objects such as `indent` and `spacing` are merged field by field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known property keys
pub mod keys {
    /// Paragraph alignment (`left`, `center`, `right`, `both`)
    pub const ALIGNMENT: &str = "alignment";
    /// Paragraph indentation object
    pub const INDENT: &str = "indent";
    /// Left indent in points (inside `indent`)
    pub const LEFT_PT: &str = "leftPt";
    /// Right indent in points (inside `indent`)
    pub const RIGHT_PT: &str = "rightPt";
    /// First-line indent in points (inside `indent`)
    pub const FIRST_LINE_PT: &str = "firstLinePt";
    /// Hanging indent in points (inside `indent`)
    pub const HANGING_PT: &str = "hangingPt";
    /// Paragraph spacing object
    pub const SPACING: &str = "spacing";
    /// Space before in points (inside `spacing`)
    pub const BEFORE_PT: &str = "beforePt";
    /// Space after in points (inside `spacing`)
    pub const AFTER_PT: &str = "afterPt";
    /// Line spacing multiplier (inside `spacing`)
    pub const LINE: &str = "line";
    /// Keep with next paragraph
    pub const KEEP_NEXT: &str = "keepNext";
    /// Outline level (0-based)
    pub const OUTLINE_LEVEL: &str = "outlineLevel";

    /// Bold toggle
    pub const BOLD: &str = "bold";
    /// Italic toggle
    pub const ITALIC: &str = "italic";
    /// Underline toggle
    pub const UNDERLINE: &str = "underline";
    /// Strike-through toggle
    pub const STRIKE: &str = "strike";
    /// All-caps toggle
    pub const CAPS: &str = "caps";

    /// Font size in points
    pub const FONT_SIZE_PT: &str = "fontSizePt";
    /// Font family name
    pub const FONT_FAMILY: &str = "fontFamily";
    /// Text color as `RRGGBB`
    pub const COLOR: &str = "color";
    /// Highlight color name
    pub const HIGHLIGHT: &str = "highlight";
    /// Vertical alignment (`superscript`, `subscript`)
    pub const VERT_ALIGN: &str = "vertAlign";
}

/// A set of formatting properties
///
/// # Example
///
/// ```
/// use docweave_ast::{keys, PropertySet};
///
/// let mut props = PropertySet::new();
/// props.set_path(&[keys::INDENT, keys::LEFT_PT], 36.0);
/// props.insert(keys::BOLD, true);
///
/// assert_eq!(props.indent_left_pt(), Some(36.0));
/// assert_eq!(props.bool(keys::BOLD), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(Map<String, Value>);

impl PropertySet {
    /// Create an empty property set
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Borrow the underlying object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Mutably borrow the underlying object
    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Consume into the underlying object
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Check whether no property is defined
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a top-level value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check whether a top-level key is defined (possibly as `null`)
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a top-level value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a top-level value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value through nested objects
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// Set a value through nested objects, creating them as needed
    ///
    /// A non-object value found on the way is replaced by an object.
    pub fn set_path(&mut self, path: &[&str], value: impl Into<Value>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = &mut self.0;
        for key in parents {
            let slot = current
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }
        current.insert(last.to_string(), value.into());
    }

    /// Builder-style [`set_path`](Self::set_path)
    pub fn with_path(mut self, path: &[&str], value: impl Into<Value>) -> Self {
        self.set_path(path, value);
        self
    }

    /// Get a nested object
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object)
    }

    /// Get a number through nested objects
    pub fn f64_at(&self, path: &[&str]) -> Option<f64> {
        self.get_path(path).and_then(Value::as_f64)
    }

    /// Get a top-level boolean
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Get a top-level string
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Extract only the `indent` sub-object as its own property set
    pub fn indent_only(&self) -> Option<PropertySet> {
        self.0
            .get(keys::INDENT)
            .map(|indent| PropertySet::new().with(keys::INDENT, indent.clone()))
    }

    /// Left indent in points
    pub fn indent_left_pt(&self) -> Option<f64> {
        self.f64_at(&[keys::INDENT, keys::LEFT_PT])
    }

    /// Right indent in points
    pub fn indent_right_pt(&self) -> Option<f64> {
        self.f64_at(&[keys::INDENT, keys::RIGHT_PT])
    }

    /// First-line indent in points
    pub fn first_line_pt(&self) -> Option<f64> {
        self.f64_at(&[keys::INDENT, keys::FIRST_LINE_PT])
    }

    /// Hanging indent in points
    pub fn hanging_pt(&self) -> Option<f64> {
        self.f64_at(&[keys::INDENT, keys::HANGING_PT])
    }

    /// Effective first-line offset: `firstLinePt`, or minus `hangingPt`
    pub fn first_line_offset_pt(&self) -> f64 {
        self.first_line_pt()
            .or_else(|| self.hanging_pt().map(|h| -h))
            .unwrap_or(0.0)
    }

    /// Whether `indent` sets `firstLinePt` or `hangingPt` (null counts)
    ///
    /// The two keys describe one quantity: the offset of the first line
    /// against the left indent.
    pub fn defines_first_line_offset(&self) -> bool {
        self.object(keys::INDENT).is_some_and(|indent| {
            indent.contains_key(keys::FIRST_LINE_PT) || indent.contains_key(keys::HANGING_PT)
        })
    }

    /// Copy without `indent.firstLinePt` and `indent.hangingPt`
    pub fn without_first_line_offset(&self) -> PropertySet {
        let mut out = self.clone();
        if let Some(Value::Object(indent)) = out.0.get_mut(keys::INDENT) {
            indent.remove(keys::FIRST_LINE_PT);
            indent.remove(keys::HANGING_PT);
        }
        out
    }

    /// Font size in points
    pub fn font_size_pt(&self) -> Option<f64> {
        self.f64_at(&[keys::FONT_SIZE_PT])
    }
}

impl From<Map<String, Value>> for PropertySet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<PropertySet> for Value {
    fn from(props: PropertySet) -> Self {
        Value::Object(props.0)
    }
}

impl FromIterator<(String, Value)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_path_creates_objects() {
        let mut props = PropertySet::new();
        props.set_path(&[keys::INDENT, keys::FIRST_LINE_PT], 12.0);
        assert_eq!(props.first_line_pt(), Some(12.0));
        assert_eq!(props.get(keys::INDENT), Some(&json!({"firstLinePt": 12.0})));
    }

    #[test]
    fn test_set_path_replaces_scalar_parent() {
        let mut props = PropertySet::new().with(keys::INDENT, Value::Null);
        props.set_path(&[keys::INDENT, keys::LEFT_PT], 10.0);
        assert_eq!(props.indent_left_pt(), Some(10.0));
    }

    #[test]
    fn test_null_is_defined() {
        let props = PropertySet::new().with(keys::COLOR, Value::Null);
        assert!(props.contains_key(keys::COLOR));
        assert_eq!(props.str(keys::COLOR), None);
    }

    #[test]
    fn test_first_line_offset_uses_hanging() {
        let props = PropertySet::new().with_path(&[keys::INDENT, keys::HANGING_PT], 18.0);
        assert_eq!(props.first_line_offset_pt(), -18.0);
        assert_eq!(PropertySet::new().first_line_offset_pt(), 0.0);
    }

    #[test]
    fn test_first_line_offset_pair() {
        let hanging = PropertySet::new()
            .with_path(&[keys::INDENT, keys::LEFT_PT], 36)
            .with_path(&[keys::INDENT, keys::HANGING_PT], 18);
        assert!(hanging.defines_first_line_offset());
        assert!(!PropertySet::new()
            .with_path(&[keys::INDENT, keys::LEFT_PT], 36)
            .defines_first_line_offset());

        let stripped = hanging.without_first_line_offset();
        assert_eq!(stripped.indent_left_pt(), Some(36.0));
        assert!(!stripped.defines_first_line_offset());
    }

    #[test]
    fn test_indent_only() {
        let props = PropertySet::new()
            .with(keys::BOLD, true)
            .with_path(&[keys::INDENT, keys::LEFT_PT], 36.0);
        let indent = props.indent_only().unwrap();
        assert_eq!(indent.len(), 1);
        assert_eq!(indent.indent_left_pt(), Some(36.0));
        assert!(PropertySet::new().indent_only().is_none());
    }

    #[test]
    fn test_serde_transparent() {
        let props = PropertySet::new().with(keys::ITALIC, true);
        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"italic":true}"#);
        let back: PropertySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
    }
}
