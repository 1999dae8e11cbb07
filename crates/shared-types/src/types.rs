use std::collections::BTreeMap;
use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Resolved document kind within a financial filing.
///
/// Schedules and annexures carry their index so that "Schedule 5" is a
/// different checklist item from "Schedule 6".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index")]
pub enum DocumentKind {
    Schedule(u32),
    Annexure(u32),
    TrialBalance,
    ReceiptPayment,
    Statement,
    Unknown,
}

impl DocumentKind {
    /// Whether this kind satisfies a checklist requirement for `required`.
    ///
    /// Matching is exact (kind + index). An `Unknown` record satisfies nothing,
    /// and nothing is satisfied by requiring `Unknown`.
    pub fn satisfies(&self, required: &DocumentKind) -> bool {
        !matches!(self, DocumentKind::Unknown) && self == required
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Schedule(n) => write!(f, "Schedule {}", n),
            DocumentKind::Annexure(n) => write!(f, "Annexure {}", n),
            DocumentKind::TrialBalance => write!(f, "Trial Balance"),
            DocumentKind::ReceiptPayment => write!(f, "Receipt-Payment Account"),
            DocumentKind::Statement => write!(f, "Financial Statement"),
            DocumentKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Per-document analysis result. Immutable once classification completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
    pub kind: DocumentKind,
    pub pages: u32,
    pub blank_pages: u32,
    /// Heuristic lower bound, not an exact count.
    pub financial_tables: u32,
    /// Labeled totals (e.g. "receipts", "grand_total"), extracted only for
    /// kinds enrolled in cross-verification. BTreeMap keeps serialization
    /// order stable.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub totals: BTreeMap<String, BigDecimal>,
    /// Set when classification fell back to defaults (parse failure, missing
    /// totals) and a warning was recorded for this entry.
    #[serde(default)]
    pub degraded: bool,
}

impl DocumentRecord {
    /// Zeroed record for an entry whose content could not be analyzed.
    pub fn degraded(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            kind: DocumentKind::Unknown,
            pages: 0,
            blank_pages: 0,
            financial_tables: 0,
            totals: BTreeMap::new(),
            degraded: true,
        }
    }

    /// Human status badge for the document table.
    pub fn status(&self) -> &'static str {
        if self.degraded {
            "Degraded"
        } else {
            "Complete"
        }
    }
}
