//! Document extractor tests — text extraction from .docx bytes, the
//! sanitization pass, and the single-repair path for page breaks inside
//! table cells.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use presently::generate::docx::{DocxError, extract_text, sanitize_text};

/// Build docx bytes around the given document.xml body content.
fn docx_bytes(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).expect("zip entry");
    zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#)
        .expect("zip write");

    zip.start_file("word/document.xml", options).expect("zip entry");
    zip.write_all(document.as_bytes()).expect("zip write");

    zip.finish().expect("zip finish").into_inner()
}

fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

#[test]
fn test_extracts_paragraph_text() {
    let bytes = docx_bytes(&format!("{}{}", paragraph("Hello"), paragraph("World")));

    let text = extract_text(&bytes).expect("Extraction failed");
    assert_eq!(text, "Hello\nWorld");
}

#[test]
fn test_tabs_and_breaks_become_whitespace() {
    let body = r#"<w:p><w:r><w:t>Left</w:t><w:tab/><w:t>Right</w:t><w:br/><w:t>Next</w:t></w:r></w:p>"#;
    let bytes = docx_bytes(body);

    let text = extract_text(&bytes).expect("Extraction failed");
    assert_eq!(text, "Left\tRight\nNext");
}

#[test]
fn test_entities_are_unescaped() {
    let bytes = docx_bytes(&paragraph("Fish &amp; Chips &lt;fresh&gt;"));

    let text = extract_text(&bytes).expect("Extraction failed");
    assert_eq!(text, "Fish & Chips <fresh>");
}

#[test]
fn test_not_a_zip_is_invalid() {
    let err = extract_text(b"this is not a docx").expect_err("Garbage accepted");
    assert!(matches!(err, DocxError::Invalid(_)));
}

#[test]
fn test_missing_document_part_is_invalid() {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("word/other.xml", options).expect("zip entry");
    zip.write_all(b"<x/>").expect("zip write");
    let bytes = zip.finish().expect("zip finish").into_inner();

    let err = extract_text(&bytes).expect_err("Zip without document part accepted");
    assert!(matches!(err, DocxError::Invalid(_)));
}

#[test]
fn test_malformed_xml_is_invalid() {
    let bytes = docx_bytes("<w:p><w:r><w:t>Broken</w:mismatch></w:r></w:p>");

    let err = extract_text(&bytes).expect_err("Malformed XML accepted");
    assert!(matches!(err, DocxError::Invalid(_)));
}

#[test]
fn test_page_break_in_table_cell_is_repaired() {
    // The known defect: a page-break run inside a table cell. Extraction
    // must succeed via the single repair pass, with the break dropped and
    // all surrounding text kept.
    let body = format!(
        r#"{}<w:tbl><w:tr><w:tc><w:p><w:r><w:br w:type="page"/><w:t>In cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>{}"#,
        paragraph("Before table"),
        paragraph("After table"),
    );
    let bytes = docx_bytes(&body);

    let text = extract_text(&bytes).expect("Repair pass did not recover the document");
    assert!(text.contains("Before table"));
    assert!(text.contains("In cell"));
    assert!(text.contains("After table"));
}

#[test]
fn test_page_break_outside_table_is_fine() {
    let body = r#"<w:p><w:r><w:t>Page one</w:t><w:br w:type="page"/><w:t>Page two</w:t></w:r></w:p>"#;
    let bytes = docx_bytes(body);

    let text = extract_text(&bytes).expect("Extraction failed");
    assert_eq!(text, "Page one\nPage two");
}

#[test]
fn test_sanitize_strips_controls_and_normalizes_line_endings() {
    let raw = "  First\r\nSecond\rThird\u{0000}\u{0007} End\ttabbed  ";
    let clean = sanitize_text(raw);

    assert_eq!(clean, "First\nSecond\nThird End\ttabbed");
}

#[test]
fn test_sanitize_keeps_unicode() {
    assert_eq!(sanitize_text("Résumé — naïve 日本語"), "Résumé — naïve 日本語");
}
