//! Configuration inputs for an analysis run: the required-document checklist
//! and the cross-verification pair specs. Both are plain data, supplied by the
//! caller and read-only for the whole run.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::DocumentKind;

/// Ordered set of required document kinds.
///
/// Order is preserved so that missing-file output follows the filing's
/// conventional layout (Schedule 1..n, then annexures, then statements).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSpec {
    required: Vec<DocumentKind>,
}

impl ChecklistSpec {
    /// Build a checklist, dropping duplicate kinds while keeping first-seen order.
    pub fn new(kinds: impl IntoIterator<Item = DocumentKind>) -> Self {
        let mut required = Vec::new();
        for kind in kinds {
            if !required.contains(&kind) {
                required.push(kind);
            }
        }
        Self { required }
    }

    /// The standard filing checklist: Schedules 1-22, Annexures 1-12, the
    /// trial balance and the receipt-payment account.
    pub fn standard_filing() -> Self {
        let schedules = (1..=22).map(DocumentKind::Schedule);
        let annexures = (1..=12).map(DocumentKind::Annexure);
        Self::new(
            schedules
                .chain(annexures)
                .chain([DocumentKind::TrialBalance, DocumentKind::ReceiptPayment]),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentKind> {
        self.required.iter()
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}

/// Selects the document (and which of its totals) forming one side of a
/// verification pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocSelector {
    /// Kind the record must have resolved to.
    pub kind: DocumentKind,
    /// Optional regex applied to the filename to narrow multiple candidates
    /// of the same kind (e.g. two trial balance files).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_pattern: Option<String>,
    /// Pick the nth candidate (0-based, filename order) instead of requiring
    /// a unique match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<usize>,
    /// Key into the record's labeled totals.
    pub total_label: String,
}

impl DocSelector {
    pub fn new(kind: DocumentKind, total_label: impl Into<String>) -> Self {
        Self {
            kind,
            filename_pattern: None,
            ordinal: None,
            total_label: total_label.into(),
        }
    }

    pub fn nth(mut self, ordinal: usize) -> Self {
        self.ordinal = Some(ordinal);
        self
    }
}

/// One configured cross-document verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSpec {
    pub name: String,
    pub left: DocSelector,
    pub right: DocSelector,
    /// Amounts within this tolerance count as equal. Zero by default, so
    /// currency totals must match exactly.
    #[serde(default = "zero")]
    pub tolerance: BigDecimal,
    /// Human status label reported when the totals match, e.g. "Balanced".
    pub match_label: String,
    /// Label reported when they do not, e.g. "Unbalanced".
    pub mismatch_label: String,
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

impl PairSpec {
    /// Receipt total vs payment total within the receipt-payment account.
    pub fn receipt_vs_payment() -> Self {
        Self {
            name: "receipt_payment".into(),
            left: DocSelector::new(DocumentKind::ReceiptPayment, "receipts"),
            right: DocSelector::new(DocumentKind::ReceiptPayment, "payments"),
            tolerance: zero(),
            match_label: "Balanced".into(),
            mismatch_label: "Unbalanced".into(),
        }
    }

    /// Grand totals across the first two trial balance files (filename order).
    pub fn trial_balance_consistency() -> Self {
        Self {
            name: "trial_balance".into(),
            left: DocSelector::new(DocumentKind::TrialBalance, "grand_total").nth(0),
            right: DocSelector::new(DocumentKind::TrialBalance, "grand_total").nth(1),
            tolerance: zero(),
            match_label: "Consistent".into(),
            mismatch_label: "Inconsistent".into(),
        }
    }

    /// The default verification set for a standard filing.
    pub fn standard_filing() -> Vec<Self> {
        vec![Self::receipt_vs_payment(), Self::trial_balance_consistency()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_filing_orders_schedules_first() {
        let spec = ChecklistSpec::standard_filing();
        assert_eq!(spec.len(), 22 + 12 + 2);
        let first: Vec<_> = spec.iter().take(3).copied().collect();
        assert_eq!(
            first,
            vec![
                DocumentKind::Schedule(1),
                DocumentKind::Schedule(2),
                DocumentKind::Schedule(3)
            ]
        );
    }

    #[test]
    fn new_drops_duplicates_keeps_order() {
        let spec = ChecklistSpec::new([
            DocumentKind::Annexure(1),
            DocumentKind::Schedule(1),
            DocumentKind::Annexure(1),
        ]);
        let kinds: Vec<_> = spec.iter().copied().collect();
        assert_eq!(
            kinds,
            vec![DocumentKind::Annexure(1), DocumentKind::Schedule(1)]
        );
    }

    #[test]
    fn pair_spec_tolerance_defaults_to_zero_on_deserialize() {
        let json = r#"{
            "name": "rp",
            "left": {"kind": {"kind": "ReceiptPayment"}, "total_label": "receipts"},
            "right": {"kind": {"kind": "ReceiptPayment"}, "total_label": "payments"},
            "match_label": "Balanced",
            "mismatch_label": "Unbalanced"
        }"#;
        let pair: PairSpec = serde_json::from_str(json).unwrap();
        assert_eq!(pair.tolerance, BigDecimal::from(0));
        assert!(pair.left.ordinal.is_none());
    }
}
