//! Best-effort plain-text extraction from uploaded .docx files.
//!
//! The document body lives in `word/document.xml` inside the zip container.
//! Extraction walks the XML once, collecting `w:t` runs, with a newline per
//! paragraph and per explicit break. One known structural defect — a page
//! break inside a table cell — gets a single repair pass before the request
//! is failed.

use std::fmt;
use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};

#[derive(Debug)]
pub enum DocxError {
    /// Not a readable docx package, or the document part is malformed.
    Invalid(String),
    /// Known defect: a page-break run inside a table cell.
    BreakInTableCell,
}

impl fmt::Display for DocxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocxError::Invalid(e) => write!(f, "invalid document: {e}"),
            DocxError::BreakInTableCell => write!(f, "page break inside a table cell"),
        }
    }
}

/// Extract sanitized plain text from docx bytes, attempting exactly one
/// repair pass for the break-in-table-cell defect before giving up.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let xml = read_document_xml(bytes)?;
    match parse_document_xml(&xml) {
        Ok(text) => Ok(sanitize_text(&text)),
        Err(DocxError::BreakInTableCell) => {
            log::warn!("docx has a page break inside a table cell; repairing and retrying once");
            let repaired = repair_table_breaks(&xml)?;
            parse_document_xml(&repaired).map(|t| sanitize_text(&t))
        }
        Err(e) => Err(e),
    }
}

fn read_document_xml(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocxError::Invalid(format!("not a zip container: {e}")))?;
    let mut part = archive
        .by_name("word/document.xml")
        .map_err(|e| DocxError::Invalid(format!("missing word/document.xml: {e}")))?;
    let mut raw = Vec::new();
    part.read_to_end(&mut raw)
        .map_err(|e| DocxError::Invalid(format!("unreadable document part: {e}")))?;
    // Encoding is forced to valid UTF-8; stray bytes become replacement chars.
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn is_page_break(e: &BytesStart) -> Result<bool, DocxError> {
    let attr = e
        .try_get_attribute("w:type")
        .map_err(|err| DocxError::Invalid(format!("bad w:br attributes: {err}")))?;
    Ok(attr.is_some_and(|a| a.value.as_ref() == b"page"))
}

fn parse_document_xml(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::with_capacity(xml.len() / 8);
    let mut in_text = false;
    let mut cell_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:tc" => cell_depth += 1,
                b"w:br" => {
                    if cell_depth > 0 && is_page_break(&e)? {
                        return Err(DocxError::BreakInTableCell);
                    }
                    out.push('\n');
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" => {
                    if cell_depth > 0 && is_page_break(&e)? {
                        return Err(DocxError::BreakInTableCell);
                    }
                    out.push('\n');
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| DocxError::Invalid(format!("bad text node: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:tc" => cell_depth = cell_depth.saturating_sub(1),
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocxError::Invalid(format!("malformed document.xml: {e}"))),
            _ => {}
        }
    }

    Ok(out)
}

/// Rewrite document.xml with page-break runs inside table cells dropped.
/// Everything else is copied through untouched.
fn repair_table_breaks(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut cell_depth = 0usize;
    let mut skipping_br = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocxError::Invalid(format!("malformed document.xml: {e}")))?;

        match &event {
            Event::Start(e) => {
                if e.name().as_ref() == b"w:tc" {
                    cell_depth += 1;
                } else if e.name().as_ref() == b"w:br" && cell_depth > 0 && is_page_break(e)? {
                    skipping_br = true;
                    continue;
                }
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"w:br" && cell_depth > 0 && is_page_break(e)? {
                    continue;
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"w:tc" {
                    cell_depth = cell_depth.saturating_sub(1);
                } else if e.name().as_ref() == b"w:br" && skipping_br {
                    skipping_br = false;
                    continue;
                }
            }
            Event::Eof => break,
            _ => {}
        }

        if skipping_br {
            continue;
        }
        writer
            .write_event(event)
            .map_err(|e| DocxError::Invalid(format!("rewrite failed: {e}")))?;
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| DocxError::Invalid(format!("rewrite produced invalid UTF-8: {e}")))
}

/// Strip control characters (keeping newline and tab), normalize line
/// endings to `\n`, and trim.
pub fn sanitize_text(s: &str) -> String {
    let unified = s.replace("\r\n", "\n").replace('\r', "\n");
    let cleaned: String = unified
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    cleaned.trim().to_string()
}
