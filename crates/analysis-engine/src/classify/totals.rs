//! Labeled-amount extraction for cross-verification.
//!
//! A `TotalRule` ties a canonical label ("receipts", "grand_total") to a regex
//! that finds the labeled line; the first amount after the label on that line
//! is parsed at full decimal precision. When a label appears more than once
//! the last occurrence wins, since running statements restate totals at the
//! bottom of the final page.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Amount token: optional currency marker, optional accountant's
    /// parentheses or minus sign, grouped digits, optional decimals. A single
    /// space may join digit groups (SI-style grouping); two or more spaces end
    /// the token, so aligned column amounts never merge into one number.
    static ref AMOUNT_PATTERN: Regex =
        Regex::new(r"(?:₹|\$|€|£|Rs\.?\s*)?\(?-?\d[\d,.]*(?: \d[\d,.]*)*\)?").unwrap();
}

/// Digit-grouping convention for amount parsing. Configurable because the
/// source filings only show literal numbers; the separator style is not
/// fixed by any format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountFormat {
    pub decimal_sep: char,
    pub group_seps: Vec<char>,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            decimal_sep: '.',
            group_seps: vec![',', ' '],
        }
    }
}

/// One canonical total and the label pattern that announces it.
#[derive(Debug, Clone)]
pub struct TotalRule {
    pub label: String,
    pub pattern: Regex,
}

impl TotalRule {
    pub fn new(label: &str, pattern: &str) -> Self {
        Self {
            label: label.to_string(),
            pattern: Regex::new(pattern).expect("invalid total rule pattern"),
        }
    }
}

/// Full amount-extraction strategy: label vocabulary plus number format.
#[derive(Debug, Clone)]
pub struct AmountRules {
    pub format: AmountFormat,
    pub rules: Vec<TotalRule>,
}

impl Default for AmountRules {
    /// The standard filing vocabulary: receipt/payment totals, debit/credit
    /// columns, opening/closing balances and the grand total.
    fn default() -> Self {
        Self {
            format: AmountFormat::default(),
            rules: vec![
                TotalRule::new("receipts", r"(?i)total\s+receipts?\b"),
                TotalRule::new("payments", r"(?i)total\s+payments?\b"),
                TotalRule::new("debit", r"(?i)(?:total\s+debits?|debit\s+total)\b"),
                TotalRule::new("credit", r"(?i)(?:total\s+credits?|credit\s+total)\b"),
                TotalRule::new("opening_balance", r"(?i)opening\s+balance\s+total\b"),
                TotalRule::new("closing_balance", r"(?i)closing\s+balance\s+total\b"),
                TotalRule::new("grand_total", r"(?i)grand\s+total\b"),
            ],
        }
    }
}

/// Extract every labeled total found in `text`. An empty map means no rule
/// produced a parseable amount; the caller records that as a warning.
pub fn extract_totals(text: &str, rules: &AmountRules) -> BTreeMap<String, BigDecimal> {
    let mut totals = BTreeMap::new();

    for rule in &rules.rules {
        let mut last = None;
        for label_match in rule.pattern.find_iter(text) {
            let line_rest = rest_of_line(text, label_match.end());
            if let Some(amount) = first_amount(line_rest, &rules.format) {
                last = Some(amount);
            }
        }
        if let Some(amount) = last {
            totals.insert(rule.label.clone(), amount);
        }
    }

    totals
}

/// Text between an offset and the end of its line.
fn rest_of_line(text: &str, from: usize) -> &str {
    let rest = &text[from..];
    match rest.find('\n') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// First parseable amount token in `text`.
fn first_amount(text: &str, format: &AmountFormat) -> Option<BigDecimal> {
    AMOUNT_PATTERN
        .find_iter(text)
        .find_map(|m| parse_amount(m.as_str(), format))
}

/// Parse one amount token under the configured grouping convention.
///
/// Accepts currency markers, accountant's parentheses for negatives, and
/// lakh/crore-style grouping ("25,00,000").
pub fn parse_amount(token: &str, format: &AmountFormat) -> Option<BigDecimal> {
    let mut s = token.trim();
    for marker in ["₹", "$", "€", "£", "Rs.", "Rs"] {
        s = s.trim_start_matches(marker).trim_start();
    }

    let mut negative = false;
    if s.starts_with('(') && s.ends_with(')') {
        negative = true;
        s = &s[1..s.len() - 1];
    }
    let s = s.trim();
    let s = match s.strip_prefix('-') {
        Some(rest) => {
            negative = !negative;
            rest
        }
        None => s,
    };

    let mut normalized = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_ascii_digit() {
            normalized.push(ch);
        } else if ch == format.decimal_sep {
            normalized.push('.');
        } else if format.group_seps.contains(&ch) {
            // grouping separator, dropped
        } else {
            return None;
        }
    }

    // Reject empty or ambiguous tokens ("..", "1.2.3").
    if !normalized.chars().any(|c| c.is_ascii_digit()) || normalized.matches('.').count() > 1 {
        return None;
    }

    let mut amount = BigDecimal::from_str(&normalized).ok()?;
    if negative {
        amount = -amount;
    }
    Some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn extracts_receipt_and_payment_totals() {
        let text = "Receipts and Payments Account\n\
                    Total Receipts    ₹2,500,000\n\
                    Total Payments    ₹2,500,000\n";
        let totals = extract_totals(text, &AmountRules::default());
        assert_eq!(totals.get("receipts"), Some(&dec("2500000")));
        assert_eq!(totals.get("payments"), Some(&dec("2500000")));
    }

    #[test]
    fn last_occurrence_of_label_wins() {
        let text = "Grand Total    1,000\n\
                    carried forward\n\
                    Grand Total    5,000,000\n";
        let totals = extract_totals(text, &AmountRules::default());
        assert_eq!(totals.get("grand_total"), Some(&dec("5000000")));
    }

    #[test]
    fn two_column_total_line_takes_first_amount() {
        // Debit and credit columns restated on one line must not merge.
        let text = "Trial Balance\n\
                    Grand Total    5,000,000    5,000,000\n";
        let totals = extract_totals(text, &AmountRules::default());
        assert_eq!(totals.get("grand_total"), Some(&dec("5000000")));
    }

    #[test]
    fn space_grouped_amount_is_one_token() {
        let text = "Total Receipts    2 500 000\n";
        let totals = extract_totals(text, &AmountRules::default());
        assert_eq!(totals.get("receipts"), Some(&dec("2500000")));
    }

    #[test]
    fn no_labels_yields_empty_map() {
        let totals = extract_totals("narrative text only", &AmountRules::default());
        assert!(totals.is_empty());
    }

    #[test]
    fn label_without_amount_is_skipped() {
        let text = "Total Receipts    see annexure\n";
        let totals = extract_totals(text, &AmountRules::default());
        assert!(totals.is_empty());
    }

    #[test]
    fn parses_lakh_style_grouping() {
        let fmt = AmountFormat::default();
        assert_eq!(parse_amount("25,00,000", &fmt), Some(dec("2500000")));
        assert_eq!(parse_amount("₹ 1,23,456.78", &fmt), Some(dec("123456.78")));
    }

    #[test]
    fn parses_negatives_and_parentheses() {
        let fmt = AmountFormat::default();
        assert_eq!(parse_amount("(1,200.50)", &fmt), Some(dec("-1200.50")));
        assert_eq!(parse_amount("-450", &fmt), Some(dec("-450")));
    }

    #[test]
    fn european_format_swaps_separators() {
        let fmt = AmountFormat {
            decimal_sep: ',',
            group_seps: vec!['.', ' '],
        };
        assert_eq!(parse_amount("2.500.000,75", &fmt), Some(dec("2500000.75")));
    }

    #[test]
    fn rejects_non_amount_tokens() {
        let fmt = AmountFormat::default();
        assert_eq!(parse_amount("1.2.3", &fmt), None);
        assert_eq!(parse_amount("()", &fmt), None);
        assert_eq!(parse_amount("annexure", &fmt), None);
    }

    #[test]
    fn precision_is_preserved() {
        // No float round-trip: sixteen-digit amounts survive exactly.
        let fmt = AmountFormat::default();
        assert_eq!(
            parse_amount("9,007,199,254,740,993", &fmt),
            Some(dec("9007199254740993"))
        );
    }
}
