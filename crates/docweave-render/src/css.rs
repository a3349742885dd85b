//! Inline CSS for resolved properties

use docweave_ast::{keys, PropertySet};

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a length in points without float noise
pub fn pt(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}pt", if text == "-0" { "0" } else { text })
}

/// Accumulates `property:value` declarations
#[derive(Debug, Default)]
pub struct Declarations(Vec<String>);

impl Declarations {
    /// Add a declaration
    pub fn push(&mut self, property: &str, value: impl AsRef<str>) {
        self.0.push(format!("{}:{}", property, value.as_ref()));
    }

    /// Whether nothing was declared
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join into a `style` attribute value (unescaped)
    pub fn to_style(&self) -> String {
        self.0.join(";")
    }
}

/// CSS for a paragraph's resolved properties
pub fn paragraph_css(props: &PropertySet) -> Declarations {
    let mut css = Declarations::default();

    if let Some(align) = props.str(keys::ALIGNMENT) {
        css.push("text-align", align);
    }
    if let Some(left) = props.indent_left_pt() {
        css.push("margin-left", pt(left));
    }
    if let Some(right) = props.indent_right_pt() {
        css.push("margin-right", pt(right));
    }
    let first_line = props.first_line_offset_pt();
    if first_line != 0.0 {
        css.push("text-indent", pt(first_line));
    }
    if let Some(before) = props.f64_at(&[keys::SPACING, keys::BEFORE_PT]) {
        css.push("margin-top", pt(before));
    }
    if let Some(after) = props.f64_at(&[keys::SPACING, keys::AFTER_PT]) {
        css.push("margin-bottom", pt(after));
    }
    if let Some(line) = props.f64_at(&[keys::SPACING, keys::LINE]) {
        css.push("line-height", format!("{}", (line * 100.0).round() / 100.0));
    }
    css
}

/// CSS for a run's resolved properties
pub fn run_css(props: &PropertySet) -> Declarations {
    let mut css = Declarations::default();

    if props.bool(keys::BOLD) == Some(true) {
        css.push("font-weight", "bold");
    }
    if props.bool(keys::ITALIC) == Some(true) {
        css.push("font-style", "italic");
    }
    let decorations: Vec<&str> = [(keys::UNDERLINE, "underline"), (keys::STRIKE, "line-through")]
        .into_iter()
        .filter(|(key, _)| props.bool(key) == Some(true))
        .map(|(_, value)| value)
        .collect();
    if !decorations.is_empty() {
        css.push("text-decoration", decorations.join(" "));
    }
    if props.bool(keys::CAPS) == Some(true) {
        css.push("text-transform", "uppercase");
    }
    if let Some(size) = props.font_size_pt() {
        css.push("font-size", pt(size));
    }
    if let Some(family) = props.str(keys::FONT_FAMILY) {
        css.push("font-family", format!("'{}'", family.replace('\'', "")));
    }
    if let Some(color) = props.str(keys::COLOR) {
        css.push("color", hex_color(color));
    }
    if let Some(highlight) = props.str(keys::HIGHLIGHT) {
        css.push("background-color", highlight.to_lowercase());
    }
    match props.str(keys::VERT_ALIGN) {
        Some("superscript") => css.push("vertical-align", "super"),
        Some("subscript") => css.push("vertical-align", "sub"),
        _ => {}
    }
    css
}

/// `FF0000` becomes `#FF0000`; named colors pass through
fn hex_color(color: &str) -> String {
    if color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("#{}", color)
    } else {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_pt_formatting() {
        assert_eq!(pt(36.0), "36pt");
        assert_eq!(pt(7.2), "7.2pt");
        assert_eq!(pt(43.199999999), "43.2pt");
        assert_eq!(pt(-18.0), "-18pt");
        assert_eq!(pt(0.0), "0pt");
    }

    #[test]
    fn test_paragraph_css() {
        let props = PropertySet::new()
            .with(keys::ALIGNMENT, "center")
            .with_path(&[keys::INDENT, keys::LEFT_PT], 36)
            .with_path(&[keys::INDENT, keys::HANGING_PT], 18)
            .with_path(&[keys::SPACING, keys::AFTER_PT], 8);
        assert_eq!(
            paragraph_css(&props).to_style(),
            "text-align:center;margin-left:36pt;text-indent:-18pt;margin-bottom:8pt"
        );
    }

    #[test]
    fn test_run_css() {
        let props = PropertySet::new()
            .with(keys::BOLD, true)
            .with(keys::ITALIC, false)
            .with(keys::UNDERLINE, true)
            .with(keys::STRIKE, true)
            .with(keys::FONT_SIZE_PT, 10.5)
            .with(keys::COLOR, "1F3864")
            .with(keys::VERT_ALIGN, "superscript");
        assert_eq!(
            run_css(&props).to_style(),
            "font-weight:bold;text-decoration:underline line-through;font-size:10.5pt;color:#1F3864;vertical-align:super"
        );
    }

    #[test]
    fn test_empty_props_give_no_css() {
        assert!(run_css(&PropertySet::new()).is_empty());
        assert!(paragraph_css(&PropertySet::new()).is_empty());
    }
}
