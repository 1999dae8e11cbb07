//! The immutable analysis report and its constituent result types.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{DocumentKind, DocumentRecord};

/// Checklist entries with no matching document record.
///
/// Derived data: recomputed from scratch whenever the record set or checklist
/// changes, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFilesResult {
    pub missing: Vec<DocumentKind>,
}

impl MissingFilesResult {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn len(&self) -> usize {
        self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Outcome of one configured pair verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum VerificationStatus {
    /// Both sides resolved to a single total; the comparison ran.
    Compared {
        left_total: BigDecimal,
        right_total: BigDecimal,
        /// Always `|left - right|`, at full input precision.
        difference: BigDecimal,
        equal: bool,
        /// Human label from the pair spec ("Balanced", "Inconsistent", ...).
        label: String,
    },
    /// A side matched zero or multiple documents, or the total label was
    /// absent. Distinct from a verified mismatch.
    Unresolved { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Pair spec name, e.g. "receipt_payment".
    pub pair: String,
    #[serde(flatten)]
    pub status: VerificationStatus,
}

impl VerificationResult {
    /// True only for a resolved comparison within tolerance.
    pub fn is_equal(&self) -> bool {
        matches!(self.status, VerificationStatus::Compared { equal: true, .. })
    }

    pub fn status_label(&self) -> &str {
        match &self.status {
            VerificationStatus::Compared { label, .. } => label,
            VerificationStatus::Unresolved { .. } => "Unresolved",
        }
    }
}

/// Cause of a non-fatal issue collected on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Entry skipped: encrypted or unknown compression.
    UnsupportedEntry,
    /// Entry degraded to an Unknown, zeroed record.
    ClassificationFailure,
    /// Kind is enrolled in verification but no parseable total was found.
    MissingTotals,
    /// One or more pages yielded no extractable text stream.
    TextExtraction,
}

/// A single non-fatal issue, scoped to one archive entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub entry: String,
    pub kind: WarningKind,
    pub detail: String,
}

/// Dashboard-level counts derived from the record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_pages: u32,
    pub total_blank_pages: u32,
    pub total_tables: u32,
    pub missing_count: u32,
}

impl Summary {
    pub fn from_records(records: &[DocumentRecord], missing: &MissingFilesResult) -> Self {
        Self {
            total_pages: records.iter().map(|r| r.pages).sum(),
            total_blank_pages: records.iter().map(|r| r.blank_pages).sum(),
            total_tables: records.iter().map(|r| r.financial_tables).sum(),
            missing_count: missing.len() as u32,
        }
    }
}

/// Complete result of one analysis run.
///
/// Constructed once by the aggregator and never mutated; a re-run replaces the
/// whole value. Serializable as-is for downstream report writers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Number of document records, always equal to `records.len()`. Entries
    /// skipped as unsupported produce a warning but no record and are not
    /// counted here.
    pub total_documents: u32,
    /// Sorted by filename, so identical archives yield identical reports
    /// regardless of entry processing order.
    pub records: Vec<DocumentRecord>,
    pub missing: MissingFilesResult,
    pub verifications: Vec<VerificationResult>,
    pub warnings: Vec<AnalysisWarning>,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(filename: &str, pages: u32, blank: u32, tables: u32) -> DocumentRecord {
        DocumentRecord {
            filename: filename.into(),
            kind: DocumentKind::Statement,
            pages,
            blank_pages: blank,
            financial_tables: tables,
            totals: Default::default(),
            degraded: false,
        }
    }

    #[test]
    fn summary_sums_record_counts() {
        let records = vec![record("a.pdf", 25, 2, 8), record("b.pdf", 15, 0, 12)];
        let missing = MissingFilesResult {
            missing: vec![DocumentKind::Schedule(5)],
        };
        let summary = Summary::from_records(&records, &missing);
        assert_eq!(
            summary,
            Summary {
                total_pages: 40,
                total_blank_pages: 2,
                total_tables: 20,
                missing_count: 1,
            }
        );
    }

    #[test]
    fn verification_round_trips_through_json() {
        let result = VerificationResult {
            pair: "receipt_payment".into(),
            status: VerificationStatus::Compared {
                left_total: BigDecimal::from(2_500_000),
                right_total: BigDecimal::from(2_500_000),
                difference: BigDecimal::from(0),
                equal: true,
                label: "Balanced".into(),
            },
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: VerificationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(back.is_equal());
        assert_eq!(back.status_label(), "Balanced");
    }

    #[test]
    fn unresolved_is_never_equal() {
        let result = VerificationResult {
            pair: "trial_balance".into(),
            status: VerificationStatus::Unresolved {
                reason: "no matching document".into(),
            },
        };
        assert!(!result.is_equal());
        assert_eq!(result.status_label(), "Unresolved");
    }
}
