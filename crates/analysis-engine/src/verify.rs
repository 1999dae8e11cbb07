//! Cross-document numeric verification.
//!
//! Comparisons run at full `BigDecimal` precision; a pair whose sides cannot
//! be pinned to exactly one document and one extracted total reports
//! `Unresolved` instead of a numeric result, so "could not verify" is never
//! conflated with "verified mismatched".

use bigdecimal::BigDecimal;
use regex::Regex;
use shared_types::{DocSelector, DocumentRecord, PairSpec, VerificationResult, VerificationStatus};
use tracing::debug;

/// Run every configured pair against the record set.
pub fn verify(records: &[DocumentRecord], pairs: &[PairSpec]) -> Vec<VerificationResult> {
    pairs
        .iter()
        .map(|pair| {
            let status = verify_pair(records, pair);
            if let VerificationStatus::Unresolved { reason } = &status {
                debug!(pair = %pair.name, reason = %reason, "verification unresolved");
            }
            VerificationResult {
                pair: pair.name.clone(),
                status,
            }
        })
        .collect()
}

fn verify_pair(records: &[DocumentRecord], pair: &PairSpec) -> VerificationStatus {
    let left = match resolve_side(records, &pair.left) {
        Ok(total) => total,
        Err(reason) => return VerificationStatus::Unresolved { reason },
    };
    let right = match resolve_side(records, &pair.right) {
        Ok(total) => total,
        Err(reason) => return VerificationStatus::Unresolved { reason },
    };

    let difference = (&left - &right).abs();
    let equal = difference <= pair.tolerance;
    let label = if equal {
        pair.match_label.clone()
    } else {
        pair.mismatch_label.clone()
    };

    VerificationStatus::Compared {
        left_total: left,
        right_total: right,
        difference,
        equal,
        label,
    }
}

/// Resolve one selector to a single extracted total, or a reason it cannot be.
fn resolve_side(records: &[DocumentRecord], selector: &DocSelector) -> Result<BigDecimal, String> {
    let pattern = match &selector.filename_pattern {
        Some(p) => {
            Some(Regex::new(p).map_err(|e| format!("invalid filename pattern {:?}: {}", p, e))?)
        }
        None => None,
    };

    let mut candidates: Vec<&DocumentRecord> = records
        .iter()
        .filter(|r| r.kind == selector.kind)
        .filter(|r| {
            pattern
                .as_ref()
                .map(|p| p.is_match(&r.filename))
                .unwrap_or(true)
        })
        .collect();
    candidates.sort_by(|a, b| a.filename.cmp(&b.filename));

    let record = match selector.ordinal {
        Some(n) => candidates.get(n).copied().ok_or_else(|| {
            format!(
                "wanted candidate {} for {}, found {}",
                n,
                selector.kind,
                candidates.len()
            )
        })?,
        None => match candidates.len() {
            1 => candidates[0],
            0 => return Err(format!("no document matched {}", selector.kind)),
            n => return Err(format!("{} documents matched {}", n, selector.kind)),
        },
    };

    record
        .totals
        .get(&selector.total_label)
        .cloned()
        .ok_or_else(|| {
            format!(
                "total {:?} not extracted from {}",
                selector.total_label, record.filename
            )
        })
}
