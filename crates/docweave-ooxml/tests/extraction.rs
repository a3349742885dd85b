//! End-to-end extraction tests
//!
//! Builds DOCX packages in memory, extracts them and runs the cascade and
//! numbering engine over the result.

use docweave_ast::{keys, NumFormat};
use docweave_core::{CascadeEngine, NumberingContext, RenderMode};
use docweave_ooxml::test_utils::DocxBuilder;
use docweave_ooxml::{DocxPackage, OoxmlArchive};

const STYLES: &str = r#"
    <w:docDefaults>
        <w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault>
        <w:pPrDefault><w:pPr><w:spacing w:after="160"/></w:pPr></w:pPrDefault>
    </w:docDefaults>
    <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
        <w:name w:val="Normal"/>
    </w:style>
    <w:style w:type="paragraph" w:styleId="Heading1">
        <w:name w:val="heading 1"/>
        <w:basedOn w:val="Normal"/>
        <w:pPr><w:keepNext/></w:pPr>
        <w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="ListParagraph">
        <w:basedOn w:val="Normal"/>
        <w:pPr><w:ind w:left="720"/></w:pPr>
    </w:style>"#;

const NUMBERING: &str = r#"
    <w:abstractNum w:abstractNumId="0">
        <w:lvl w:ilvl="0">
            <w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/>
            <w:pPr><w:ind w:left="360" w:hanging="360"/></w:pPr>
        </w:lvl>
        <w:lvl w:ilvl="1">
            <w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%2)"/>
            <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
        </w:lvl>
    </w:abstractNum>
    <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>"#;

fn list_item(ilvl: u32, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        ilvl, text
    )
}

fn sample() -> Vec<u8> {
    let mut body = String::from(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Plan</w:t></w:r></w:p>"#,
    );
    for (ilvl, text) in [(0, "one"), (0, "two"), (1, "two-a"), (1, "two-b"), (0, "three")] {
        body.push_str(&list_item(ilvl, text));
    }
    DocxBuilder::new()
        .styles(STYLES)
        .numbering(NUMBERING)
        .body(body)
        .build()
        .unwrap()
}

#[test]
fn test_extract_all_parts() {
    let package = DocxPackage::from_bytes(&sample()).unwrap();

    assert_eq!(package.styles.styles.len(), 3);
    assert_eq!(package.styles.defaults.paragraph.as_deref(), Some("Normal"));
    assert_eq!(
        package.styles.document_defaults.run_props.font_size_pt(),
        Some(11.0)
    );
    assert_eq!(
        package.numbering.level("1", 1).unwrap().num_fmt,
        NumFormat::LowerLetter
    );
    assert_eq!(package.document.paragraphs().len(), 6);
}

#[test]
fn test_extracted_document_cascades() {
    let package = DocxPackage::from_bytes(&sample()).unwrap();
    let resolved = package.resolve();
    let paragraphs = resolved.paragraphs();

    let heading = paragraphs[0];
    assert_eq!(heading.properties.bool(keys::KEEP_NEXT), Some(true));
    assert_eq!(
        heading.properties.f64_at(&[keys::SPACING, keys::AFTER_PT]),
        Some(8.0)
    );
    let heading_run = heading.runs[0].properties.as_ref().unwrap();
    assert_eq!(heading_run.font_size_pt(), Some(16.0));
    assert_eq!(heading_run.str(keys::FONT_FAMILY), Some("Calibri"));

    // Numbering indentation beats the ListParagraph indent
    let first_item = paragraphs[1];
    assert_eq!(first_item.properties.indent_left_pt(), Some(18.0));
    assert_eq!(first_item.properties.hanging_pt(), Some(18.0));
    let nested_item = paragraphs[3];
    assert_eq!(nested_item.properties.indent_left_pt(), Some(36.0));
}

#[test]
fn test_extracted_lists_number_in_order() {
    let package = DocxPackage::from_bytes(&sample()).unwrap();
    let resolved = package.resolve();

    let mut ctx = NumberingContext::new();
    let markers: Vec<String> = resolved
        .paragraphs()
        .iter()
        .filter_map(|p| p.numbering.as_ref())
        .map(|r| ctx.format(r, &package.numbering, RenderMode::PlainText).marker)
        .collect();

    assert_eq!(markers, vec!["1. ", "2. ", "a) ", "b) ", "3. "]);
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_unknown_style_reference_is_reported() {
    let bytes = DocxBuilder::new()
        .styles(STYLES)
        .body(r#"<w:p><w:pPr><w:pStyle w:val="Missing"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#)
        .build()
        .unwrap();
    let package = DocxPackage::from_bytes(&bytes).unwrap();

    let mut engine = CascadeEngine::new(&package.styles);
    let resolved = engine.resolve_document(package.document.clone(), &package.numbering);

    assert_eq!(engine.diagnostics().len(), 1);
    // Only document defaults apply
    let paragraph = resolved.paragraphs()[0];
    assert_eq!(paragraph.properties.bool(keys::KEEP_NEXT), None);
    assert_eq!(
        paragraph.runs[0].properties.as_ref().unwrap().font_size_pt(),
        Some(11.0)
    );
}

#[test]
fn test_open_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.docx");
    std::fs::write(&path, sample()).unwrap();

    let archive = OoxmlArchive::open(&path).unwrap();
    assert!(archive.numbering_xml().is_some());

    let package = DocxPackage::open(&path).unwrap();
    assert_eq!(package.document.paragraphs()[0].text(), "Plan");
}
