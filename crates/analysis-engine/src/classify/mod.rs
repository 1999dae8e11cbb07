//! Document classification: kind resolution, page statistics and labeled
//! totals, built on top of `pdf-inspect` profiles.

pub mod patterns;
pub mod totals;

pub use totals::{AmountFormat, AmountRules};

use std::collections::BTreeMap;
use std::collections::HashSet;

use shared_types::{AnalysisWarning, DocumentKind, DocumentRecord, WarningKind};
use tracing::warn;

use pdf_inspect::{InspectConfig, PdfProfile};

/// Classify one extracted entry. Never fails: an unparseable PDF degrades to
/// an `Unknown`, zeroed record plus a warning.
pub fn classify_entry(
    filename: &str,
    bytes: &[u8],
    enrolled: &HashSet<DocumentKind>,
    inspect_cfg: &InspectConfig,
    rules: &AmountRules,
) -> (DocumentRecord, Vec<AnalysisWarning>) {
    match pdf_inspect::inspect(bytes, inspect_cfg) {
        Ok(profile) => classify_profile(filename, &profile, enrolled, rules),
        Err(e) => {
            warn!(entry = filename, error = %e, "classification failed, degrading entry");
            let warning = AnalysisWarning {
                entry: filename.to_string(),
                kind: WarningKind::ClassificationFailure,
                detail: e.to_string(),
            };
            (DocumentRecord::degraded(filename), vec![warning])
        }
    }
}

/// Pure classification over an inspected profile.
///
/// Kind resolution order: filename patterns, then first-page heading sniff,
/// then `Unknown`. Totals are extracted only when the resolved kind is
/// enrolled in cross-verification; an enrolled document with no parseable
/// total is flagged rather than failed.
pub fn classify_profile(
    filename: &str,
    profile: &PdfProfile,
    enrolled: &HashSet<DocumentKind>,
    rules: &AmountRules,
) -> (DocumentRecord, Vec<AnalysisWarning>) {
    let mut warnings = Vec::new();

    let kind = patterns::kind_from_filename(filename)
        .or_else(|| patterns::kind_from_content(profile.first_page_text()))
        .unwrap_or(DocumentKind::Unknown);

    let totals = if enrolled.contains(&kind) {
        let totals = totals::extract_totals(&profile.full_text(), rules);
        if totals.is_empty() {
            warnings.push(AnalysisWarning {
                entry: filename.to_string(),
                kind: WarningKind::MissingTotals,
                detail: format!("no parseable total found for {}", kind),
            });
        }
        totals
    } else {
        BTreeMap::new()
    };

    if profile.text_failures > 0 {
        warnings.push(AnalysisWarning {
            entry: filename.to_string(),
            kind: WarningKind::TextExtraction,
            detail: format!("{} page(s) without extractable text", profile.text_failures),
        });
    }

    let record = DocumentRecord {
        filename: filename.to_string(),
        kind,
        pages: profile.page_count(),
        blank_pages: profile.blank_page_count(),
        financial_tables: profile.table_count(),
        totals,
        degraded: !warnings.is_empty(),
    };

    (record, warnings)
}
