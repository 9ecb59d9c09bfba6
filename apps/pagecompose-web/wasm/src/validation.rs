//! Input document checks
//!
//! Cheap header/trailer sniffing before a full lopdf parse, and the
//! summary shown when a file is dropped onto a layout tool.

use lopdf::Document;
use serde::Serialize;

/// Summary of a parsed input document
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct PdfInfo {
    pub page_count: u32,
    /// Header version, e.g. "1.7"
    pub version: String,
    /// Layout still works on encrypted files; rendering may not
    pub encrypted: bool,
    pub size_bytes: usize,
}

fn check_header(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() < 8 {
        return Err("File too small to be a valid PDF".to_string());
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err("Not a valid PDF file (missing %PDF- header)".to_string());
    }
    Ok(())
}

/// Parse `bytes` and summarize the document
pub fn validate_pdf(bytes: &[u8]) -> Result<PdfInfo, String> {
    check_header(bytes)?;
    let document = Document::load_mem(bytes).map_err(|e| format!("Failed to parse PDF: {}", e))?;
    summarize(&document, bytes)
}

/// Summarize an already parsed document
pub fn summarize(document: &Document, bytes: &[u8]) -> Result<PdfInfo, String> {
    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err("PDF has no pages".to_string());
    }

    Ok(PdfInfo {
        page_count,
        version: header_version(bytes).unwrap_or_else(|| document.version.clone()),
        encrypted: document.is_encrypted(),
        size_bytes: bytes.len(),
    })
}

fn header_version(bytes: &[u8]) -> Option<String> {
    let raw = bytes.get(5..8)?;
    std::str::from_utf8(raw).ok().map(|v| v.trim().to_string())
}

/// Header and %%EOF check without parsing the object graph
pub fn quick_validate(bytes: &[u8]) -> Result<(), String> {
    check_header(bytes)?;

    let tail = &bytes[bytes.len().saturating_sub(1024)..];
    if !tail.windows(5).any(|w| w == b"%%EOF") {
        return Err("PDF appears truncated (missing %%EOF marker)".to_string());
    }
    Ok(())
}
