//! Checklist completeness: which required documents are absent.

use shared_types::{ChecklistSpec, DocumentRecord, MissingFilesResult};

/// Set-difference of the checklist against the kinds actually present.
///
/// Pure and order-insensitive: the missing set depends only on which kinds
/// exist in `records`, never on archive entry order. Output follows checklist
/// order.
pub fn check_missing(records: &[DocumentRecord], checklist: &ChecklistSpec) -> MissingFilesResult {
    let missing = checklist
        .iter()
        .filter(|&required| !records.iter().any(|r| r.kind.satisfies(required)))
        .copied()
        .collect();
    MissingFilesResult { missing }
}
