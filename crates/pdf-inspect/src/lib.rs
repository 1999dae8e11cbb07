//! Structural inspection of financial PDFs.
//!
//! Produces a per-page profile (extracted text, graphics presence, heuristic
//! table count) plus document-level aggregates. Classification policy lives in
//! `analysis-engine`; this crate only reads structure.

pub mod tables;

pub use tables::TableConfig;

use lopdf::content::{Content, Operation};
use lopdf::Document;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),
}

/// Inspection thresholds.
///
/// The blank-page text threshold is deliberately configurable: scanned filings
/// often carry a few stray OCR characters on visually blank pages.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Normalized page text at or below this many characters counts as "no text".
    pub blank_text_max_chars: usize,
    pub tables: TableConfig,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            blank_text_max_chars: 0,
            tables: TableConfig::default(),
        }
    }
}

/// One page of the document, in page-number order.
#[derive(Debug, Clone)]
pub struct PageProfile {
    pub number: u32,
    /// Raw extracted text; empty when extraction failed.
    pub text: String,
    /// Image XObjects, inline images, shading or painted paths present.
    pub has_graphics: bool,
    pub table_count: u32,
    /// No extractable text (after whitespace normalization) AND no graphics.
    /// Both signals are required so scanned-but-visually-blank pages are not
    /// misclassified.
    pub is_blank: bool,
}

/// Whole-document inspection result.
#[derive(Debug, Clone)]
pub struct PdfProfile {
    pub pages: Vec<PageProfile>,
    /// Pages whose text stream could not be decoded.
    pub text_failures: u32,
}

impl PdfProfile {
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn blank_page_count(&self) -> u32 {
        self.pages.iter().filter(|p| p.is_blank).count() as u32
    }

    pub fn table_count(&self) -> u32 {
        self.pages.iter().map(|p| p.table_count).sum()
    }

    pub fn first_page_text(&self) -> &str {
        self.pages.first().map(|p| p.text.as_str()).unwrap_or("")
    }

    /// All page text joined for heading sniffs and totals extraction.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            out.push_str(&page.text);
            out.push('\n');
        }
        out
    }
}

/// Parse and profile a PDF from memory.
pub fn inspect(bytes: &[u8], cfg: &InspectConfig) -> Result<PdfProfile, InspectError> {
    let doc = Document::load_mem(bytes).map_err(|e| InspectError::Parse(e.to_string()))?;

    let mut pages = Vec::new();
    let mut text_failures = 0u32;

    for (number, page_id) in doc.get_pages() {
        let text = match doc.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                debug!(page = number, error = %e, "text extraction failed");
                text_failures += 1;
                String::new()
            }
        };

        let ops = page_operations(&doc, page_id);
        let has_graphics = ops.iter().any(is_graphics_op);
        let table_count = tables::count_tables(&ops, &text, &cfg.tables);
        let is_blank = normalize_ws(&text).len() <= cfg.blank_text_max_chars && !has_graphics;

        pages.push(PageProfile {
            number,
            text,
            has_graphics,
            table_count,
            is_blank,
        });
    }

    Ok(PdfProfile {
        pages,
        text_failures,
    })
}

/// Decoded content-stream operations for one page; empty on decode failure.
fn page_operations(doc: &Document, page_id: lopdf::ObjectId) -> Vec<Operation> {
    let data = match doc.get_page_content(page_id) {
        Ok(data) => data,
        Err(e) => {
            debug!(error = %e, "unreadable page content stream");
            return Vec::new();
        }
    };
    match Content::decode(&data) {
        Ok(content) => content.operations,
        Err(e) => {
            debug!(error = %e, "undecodable page content stream");
            Vec::new()
        }
    }
}

/// Operators that put ink on the page outside of text showing: XObject
/// placement, inline images, shading, and painted path operators.
fn is_graphics_op(op: &Operation) -> bool {
    matches!(
        op.operator.as_str(),
        "Do" | "BI" | "sh" | "f" | "F" | "f*" | "b" | "b*" | "B" | "B*" | "S" | "s"
    )
}

/// Collapse all whitespace runs to single spaces and trim.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
