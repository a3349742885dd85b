//! Mapping of `w:pPr` / `w:rPr` children onto property sets
//!
//! Lengths are converted to points on the way in: twips (1/20 pt) for
//! indentation and spacing, half-points for font sizes. Toggle properties
//! such as `w:b` are on unless `w:val` is `0`, `false` or `off`.

use docweave_ast::{keys, PropertySet};
use quick_xml::events::BytesStart;
use serde_json::Value;

/// Read an attribute by qualified name, with entities unescaped
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Read the first attribute present among `names`
pub(crate) fn get_any_attr(e: &BytesStart, names: &[&[u8]]) -> Option<String> {
    names.iter().find_map(|name| get_attr(e, name))
}

/// Convert twentieths of a point to points
pub fn twips_to_pt(twips: f64) -> f64 {
    twips / 20.0
}

/// Convert half-points to points
pub fn half_points_to_pt(half_points: f64) -> f64 {
    half_points / 2.0
}

/// Parse a twips attribute into points
pub(crate) fn twips_attr(e: &BytesStart, names: &[&[u8]]) -> Option<f64> {
    get_any_attr(e, names)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(twips_to_pt)
}

/// Value of a toggle element
pub(crate) fn toggle(e: &BytesStart) -> bool {
    !matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

/// A number as a JSON value, integral when possible
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Apply one paragraph-property element to `props`
///
/// Unknown elements are ignored.
pub fn apply_paragraph_property(props: &mut PropertySet, e: &BytesStart) {
    match e.local_name().as_ref() {
        b"jc" => {
            if let Some(val) = get_attr(e, b"w:val") {
                props.insert(keys::ALIGNMENT, alignment(&val));
            }
        }
        b"ind" => {
            let fields: [(&str, &[&[u8]]); 4] = [
                (keys::LEFT_PT, &[b"w:left", b"w:start"]),
                (keys::RIGHT_PT, &[b"w:right", b"w:end"]),
                (keys::FIRST_LINE_PT, &[b"w:firstLine"]),
                (keys::HANGING_PT, &[b"w:hanging"]),
            ];
            for (key, names) in fields {
                if let Some(pt) = twips_attr(e, names) {
                    props.set_path(&[keys::INDENT, key], number(pt));
                }
            }
        }
        b"spacing" => {
            if let Some(pt) = twips_attr(e, &[b"w:before"]) {
                props.set_path(&[keys::SPACING, keys::BEFORE_PT], number(pt));
            }
            if let Some(pt) = twips_attr(e, &[b"w:after"]) {
                props.set_path(&[keys::SPACING, keys::AFTER_PT], number(pt));
            }
            if let Some(line) = get_attr(e, b"w:line").and_then(|v| v.parse::<f64>().ok()) {
                // auto: 240ths of a line; exact / atLeast: twips
                let value = match get_attr(e, b"w:lineRule").as_deref() {
                    Some("exact") | Some("atLeast") => twips_to_pt(line),
                    _ => line / 240.0,
                };
                props.set_path(&[keys::SPACING, keys::LINE], number(value));
            }
        }
        b"keepNext" => props.insert(keys::KEEP_NEXT, toggle(e)),
        b"outlineLvl" => {
            if let Some(level) = get_attr(e, b"w:val").and_then(|v| v.parse::<u8>().ok()) {
                props.insert(keys::OUTLINE_LEVEL, level);
            }
        }
        _ => {}
    }
}

/// Apply one run-property element to `props`
///
/// Unknown elements are ignored.
pub fn apply_run_property(props: &mut PropertySet, e: &BytesStart) {
    match e.local_name().as_ref() {
        b"b" => props.insert(keys::BOLD, toggle(e)),
        b"i" => props.insert(keys::ITALIC, toggle(e)),
        b"strike" => props.insert(keys::STRIKE, toggle(e)),
        b"caps" => props.insert(keys::CAPS, toggle(e)),
        b"u" => {
            let on = !matches!(get_attr(e, b"w:val").as_deref(), Some("none"));
            props.insert(keys::UNDERLINE, on);
        }
        b"sz" => {
            if let Some(size) = get_attr(e, b"w:val").and_then(|v| v.parse::<f64>().ok()) {
                props.insert(keys::FONT_SIZE_PT, number(half_points_to_pt(size)));
            }
        }
        b"rFonts" => {
            if let Some(font) = get_any_attr(e, &[b"w:ascii", b"w:hAnsi", b"w:cs"]) {
                props.insert(keys::FONT_FAMILY, font);
            }
        }
        b"color" => {
            if let Some(color) = get_attr(e, b"w:val").filter(|c| c != "auto") {
                props.insert(keys::COLOR, color);
            }
        }
        b"highlight" => {
            if let Some(color) = get_attr(e, b"w:val").filter(|c| c != "none") {
                props.insert(keys::HIGHLIGHT, color);
            }
        }
        b"vertAlign" => {
            if let Some(align) = get_attr(e, b"w:val") {
                props.insert(keys::VERT_ALIGN, align);
            }
        }
        _ => {}
    }
}

fn alignment(val: &str) -> &'static str {
    match val {
        "center" => "center",
        "right" | "end" => "right",
        "both" | "distribute" => "justify",
        _ => "left",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn element(xml: &str) -> BytesStart<'static> {
        let mut reader = Reader::from_str(xml);
        match reader.read_event().unwrap() {
            Event::Empty(e) | Event::Start(e) => e.into_owned(),
            other => panic!("expected element, got {:?}", other),
        }
    }

    fn paragraph(xml: &str) -> PropertySet {
        let mut props = PropertySet::new();
        apply_paragraph_property(&mut props, &element(xml));
        props
    }

    fn run(xml: &str) -> PropertySet {
        let mut props = PropertySet::new();
        apply_run_property(&mut props, &element(xml));
        props
    }

    #[test]
    fn test_indent_in_points() {
        let props = paragraph(r#"<w:ind w:left="720" w:hanging="360"/>"#);
        assert_eq!(props.indent_left_pt(), Some(36.0));
        assert_eq!(props.hanging_pt(), Some(18.0));
        assert_eq!(props.first_line_pt(), None);
    }

    #[test]
    fn test_indent_start_end_aliases() {
        let props = paragraph(r#"<w:ind w:start="100" w:end="50" w:firstLine="10"/>"#);
        assert_eq!(props.indent_left_pt(), Some(5.0));
        assert_eq!(props.indent_right_pt(), Some(2.5));
        assert_eq!(props.first_line_pt(), Some(0.5));
    }

    #[test]
    fn test_spacing() {
        let props = paragraph(r#"<w:spacing w:before="240" w:after="160" w:line="276" w:lineRule="auto"/>"#);
        assert_eq!(props.f64_at(&[keys::SPACING, keys::BEFORE_PT]), Some(12.0));
        assert_eq!(props.f64_at(&[keys::SPACING, keys::AFTER_PT]), Some(8.0));
        assert_eq!(props.f64_at(&[keys::SPACING, keys::LINE]), Some(1.15));

        let exact = paragraph(r#"<w:spacing w:line="360" w:lineRule="exact"/>"#);
        assert_eq!(exact.f64_at(&[keys::SPACING, keys::LINE]), Some(18.0));
    }

    #[test]
    fn test_alignment_values() {
        assert_eq!(paragraph(r#"<w:jc w:val="both"/>"#).str(keys::ALIGNMENT), Some("justify"));
        assert_eq!(paragraph(r#"<w:jc w:val="end"/>"#).str(keys::ALIGNMENT), Some("right"));
        assert_eq!(paragraph(r#"<w:jc w:val="start"/>"#).str(keys::ALIGNMENT), Some("left"));
    }

    #[test]
    fn test_toggles() {
        assert_eq!(run(r#"<w:b/>"#).bool(keys::BOLD), Some(true));
        assert_eq!(run(r#"<w:b w:val="0"/>"#).bool(keys::BOLD), Some(false));
        assert_eq!(run(r#"<w:i w:val="false"/>"#).bool(keys::ITALIC), Some(false));
        assert_eq!(run(r#"<w:caps w:val="1"/>"#).bool(keys::CAPS), Some(true));
        assert_eq!(paragraph(r#"<w:keepNext/>"#).bool(keys::KEEP_NEXT), Some(true));
    }

    #[test]
    fn test_font_size_half_points() {
        assert_eq!(run(r#"<w:sz w:val="22"/>"#).font_size_pt(), Some(11.0));
        assert_eq!(run(r#"<w:sz w:val="21"/>"#).font_size_pt(), Some(10.5));
    }

    #[test]
    fn test_fonts_and_colors() {
        let fonts = run(r#"<w:rFonts w:hAnsi="Cambria" w:ascii="Calibri"/>"#);
        assert_eq!(fonts.str(keys::FONT_FAMILY), Some("Calibri"));
        assert!(run(r#"<w:color w:val="auto"/>"#).is_empty());
        assert_eq!(run(r#"<w:color w:val="FF0000"/>"#).str(keys::COLOR), Some("FF0000"));
        assert_eq!(run(r#"<w:u w:val="none"/>"#).bool(keys::UNDERLINE), Some(false));
        assert_eq!(run(r#"<w:u w:val="single"/>"#).bool(keys::UNDERLINE), Some(true));
    }

    #[test]
    fn test_unknown_elements_ignored() {
        assert!(run(r#"<w:noProof/>"#).is_empty());
        assert!(paragraph(r#"<w:widowControl/>"#).is_empty());
    }

    #[test]
    fn test_integral_points_stay_integers() {
        let props = paragraph(r#"<w:ind w:left="720"/>"#);
        assert_eq!(
            props.get_path(&[keys::INDENT, keys::LEFT_PT]),
            Some(&Value::from(36))
        );
    }
}
