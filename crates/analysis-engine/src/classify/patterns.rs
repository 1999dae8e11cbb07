//! Filename and heading patterns for document-kind resolution.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::DocumentKind;

lazy_static! {
    /// Indexed supporting documents: "Schedule_5", "schedule 05", "Schedule-5".
    static ref SCHEDULE_PATTERN: Regex =
        Regex::new(r"(?i)schedule[\s_\-]*0*(\d{1,3})").unwrap();

    static ref ANNEXURE_PATTERN: Regex =
        Regex::new(r"(?i)annexure[\s_\-]*0*(\d{1,3})").unwrap();

    static ref TRIAL_BALANCE_PATTERN: Regex =
        Regex::new(r"(?i)trial[\s_\-]*balance").unwrap();

    static ref RECEIPT_PAYMENT_PATTERN: Regex =
        Regex::new(r"(?i)receipts?[\s_\-]*(?:and[\s_\-]+|&[\s_\-]*)?payments?").unwrap();

    /// Generic financial statements, checked last.
    static ref STATEMENT_PATTERN: Regex = Regex::new(
        r"(?i)(financial[\s_\-]*statement|balance[\s_\-]*sheet|income[\s_\-]*(statement|account)|profit[\s_\-]*(and|&)[\s_\-]*loss)"
    )
    .unwrap();
}

/// Resolve a kind from a name or heading fragment. Specific kinds win over
/// the generic statement pattern; `None` means no pattern matched.
fn resolve(text: &str) -> Option<DocumentKind> {
    if let Some(caps) = SCHEDULE_PATTERN.captures(text) {
        if let Ok(index) = caps[1].parse() {
            return Some(DocumentKind::Schedule(index));
        }
    }
    if let Some(caps) = ANNEXURE_PATTERN.captures(text) {
        if let Ok(index) = caps[1].parse() {
            return Some(DocumentKind::Annexure(index));
        }
    }
    if TRIAL_BALANCE_PATTERN.is_match(text) {
        return Some(DocumentKind::TrialBalance);
    }
    if RECEIPT_PAYMENT_PATTERN.is_match(text) {
        return Some(DocumentKind::ReceiptPayment);
    }
    if STATEMENT_PATTERN.is_match(text) {
        return Some(DocumentKind::Statement);
    }
    None
}

/// Primary resolution: filename pattern match.
pub fn kind_from_filename(filename: &str) -> Option<DocumentKind> {
    resolve(filename)
}

/// Fallback resolution: canonical headings on the first page.
pub fn kind_from_content(first_page_text: &str) -> Option<DocumentKind> {
    resolve(first_page_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn schedule_filenames_resolve_with_index() {
        assert_eq!(
            kind_from_filename("Schedule_1_Assets.pdf"),
            Some(DocumentKind::Schedule(1))
        );
        assert_eq!(
            kind_from_filename("schedule 22.pdf"),
            Some(DocumentKind::Schedule(22))
        );
        assert_eq!(
            kind_from_filename("SCHEDULE-05.pdf"),
            Some(DocumentKind::Schedule(5))
        );
    }

    #[test]
    fn annexure_filenames_resolve_with_index() {
        assert_eq!(
            kind_from_filename("Annexure_12_Notes.pdf"),
            Some(DocumentKind::Annexure(12))
        );
    }

    #[test]
    fn statement_kinds_resolve_from_filenames() {
        assert_eq!(
            kind_from_filename("Trial_Balance_Q4.pdf"),
            Some(DocumentKind::TrialBalance)
        );
        assert_eq!(
            kind_from_filename("Receipt_Payment_Account.pdf"),
            Some(DocumentKind::ReceiptPayment)
        );
        assert_eq!(
            kind_from_filename("Financial_Statement_2023.pdf"),
            Some(DocumentKind::Statement)
        );
    }

    #[test]
    fn unmatched_filename_yields_none() {
        assert_eq!(kind_from_filename("scan0001.pdf"), None);
        assert_eq!(kind_from_filename("notes.pdf"), None);
    }

    #[test]
    fn headings_resolve_from_content() {
        assert_eq!(
            kind_from_content("ACME Ltd\nTrial Balance as at 31 March 2023"),
            Some(DocumentKind::TrialBalance)
        );
        assert_eq!(
            kind_from_content("Receipts and Payments Account for the year"),
            Some(DocumentKind::ReceiptPayment)
        );
        assert_eq!(
            kind_from_content("Schedule 7 - Fixed Assets"),
            Some(DocumentKind::Schedule(7))
        );
    }

    #[test]
    fn specific_kind_beats_generic_statement() {
        // Contains both a statement phrase and a schedule heading.
        assert_eq!(
            kind_from_content("Balance Sheet\nSchedule 3 - Investments"),
            Some(DocumentKind::Schedule(3))
        );
    }
}
