//! Financial-table detection heuristics.
//!
//! Two independent signals, the stronger of which wins per page:
//! - ruled grids: a dense cluster of rectangle operators in the content stream,
//! - aligned columns: runs of text lines that split into several cells with
//!   mostly numeric content.
//!
//! The count is a lower bound, not an exact table census. A page covered by
//! one dense ruled grid counts once even if it visually holds two tables.

use lopdf::content::Operation;

/// Detection thresholds. All configurable; defaults tuned for statement-style
/// layouts with amount columns.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Rectangle operators on a page at or above this count signal a ruled grid.
    pub min_ruled_rects: usize,
    /// Minimum cells per line for the aligned-whitespace signal.
    pub min_columns: usize,
    /// Minimum consecutive tabular lines forming one detected table.
    pub min_rows: usize,
    /// Minimum amount-like cells per tabular line.
    pub min_numeric_cells: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_ruled_rects: 8,
            min_columns: 3,
            min_rows: 3,
            min_numeric_cells: 2,
        }
    }
}

/// Lower-bound table count for one page.
pub fn count_tables(ops: &[Operation], text: &str, cfg: &TableConfig) -> u32 {
    ruled_table_count(ops, cfg).max(text_table_count(text, cfg))
}

/// One ruled table per page when the rectangle density crosses the threshold.
fn ruled_table_count(ops: &[Operation], cfg: &TableConfig) -> u32 {
    let rects = ops.iter().filter(|op| op.operator == "re").count();
    u32::from(rects >= cfg.min_ruled_rects)
}

/// Count runs of consecutive tabular lines in the extracted text.
fn text_table_count(text: &str, cfg: &TableConfig) -> u32 {
    let mut tables = 0u32;
    let mut run = 0usize;

    for line in text.lines() {
        if is_tabular_line(line, cfg) {
            run += 1;
            if run == cfg.min_rows {
                tables += 1;
            }
        } else {
            run = 0;
        }
    }

    tables
}

/// A line is tabular when it splits into enough whitespace-aligned cells and
/// enough of them look like amounts.
fn is_tabular_line(line: &str, cfg: &TableConfig) -> bool {
    let cells: Vec<&str> = split_cells(line);
    if cells.len() < cfg.min_columns {
        return false;
    }
    let numeric = cells.iter().filter(|c| is_amount_cell(c)).count();
    numeric >= cfg.min_numeric_cells
}

/// Split on runs of two or more spaces, or on tabs.
fn split_cells(line: &str) -> Vec<&str> {
    line.split(['\t'])
        .flat_map(|part| part.split("  "))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Amount-like cell: digits with optional grouping, sign, currency symbol or
/// accountant's parentheses.
fn is_amount_cell(cell: &str) -> bool {
    let trimmed = cell
        .trim_start_matches(['₹', '$', '€', '£'])
        .trim_start_matches("Rs.")
        .trim_start_matches("Rs")
        .trim();
    let mut digits = 0usize;
    for ch in trimmed.chars() {
        match ch {
            '0'..='9' => digits += 1,
            ',' | '.' | '(' | ')' | '-' | ' ' => {}
            _ => return false,
        }
    }
    digits > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rect_ops(n: usize) -> Vec<Operation> {
        (0..n)
            .map(|i| {
                Operation::new(
                    "re",
                    vec![(i as i64).into(), 0i64.into(), 100i64.into(), 20i64.into()],
                )
            })
            .collect()
    }

    #[test]
    fn dense_rect_cluster_counts_as_ruled_table() {
        let cfg = TableConfig::default();
        assert_eq!(count_tables(&rect_ops(8), "", &cfg), 1);
        assert_eq!(count_tables(&rect_ops(7), "", &cfg), 0);
    }

    #[test]
    fn aligned_amount_columns_count_as_table() {
        let cfg = TableConfig::default();
        let text = "Account          Debit        Credit\n\
                    Cash             1,20,000     0\n\
                    Receivables      45,000       12,500\n\
                    Payables         0            88,000\n";
        assert_eq!(count_tables(&[], text, &cfg), 1);
    }

    #[test]
    fn separate_runs_count_separately() {
        let cfg = TableConfig::default();
        let text = "Cash      1,000     2,000\n\
                    Bank      3,000     4,000\n\
                    Loans     5,000     6,000\n\
                    \n\
                    Narrative paragraph with no columns at all.\n\
                    \n\
                    Rent      7,000     8,000\n\
                    Wages     9,000     1,000\n\
                    Power     2,000     3,000\n";
        assert_eq!(count_tables(&[], text, &cfg), 2);
    }

    #[test]
    fn prose_is_not_a_table() {
        let cfg = TableConfig::default();
        let text = "The company performed well during the year.\n\
                    Revenue grew and expenses were contained.\n\
                    The board thanks its employees.\n";
        assert_eq!(count_tables(&[], text, &cfg), 0);
    }

    #[test]
    fn short_runs_are_ignored() {
        let cfg = TableConfig::default();
        let text = "Cash      1,000     2,000\n\
                    Bank      3,000     4,000\n";
        assert_eq!(count_tables(&[], text, &cfg), 0);
    }

    #[test]
    fn amount_cells_accept_currency_and_parentheses() {
        assert!(is_amount_cell("₹2,500,000"));
        assert!(is_amount_cell("(1,200.50)"));
        assert!(is_amount_cell("Rs. 25,00,000"));
        assert!(!is_amount_cell("Receivables"));
        assert!(!is_amount_cell("-"));
    }

    #[test]
    fn ruled_and_text_signals_do_not_double_count() {
        let cfg = TableConfig::default();
        let text = "Cash      1,000     2,000\n\
                    Bank      3,000     4,000\n\
                    Loans     5,000     6,000\n";
        // Same table detected both ways still counts once.
        assert_eq!(count_tables(&rect_ops(12), text, &cfg), 1);
    }
}
