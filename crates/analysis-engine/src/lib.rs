//! Document-set analysis engine for financial filings.
//!
//! Ingests a ZIP archive of financial PDFs and produces a single immutable
//! [`shared_types::AnalysisReport`]: per-document classification and page
//! statistics, a missing-document list against a configurable checklist, and
//! cross-document numeric verifications.
//!
//! ```no_run
//! use analysis_engine::Analyzer;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = File::open("filing.zip")?;
//! let report = Analyzer::standard_filing().analyze(archive)?;
//! println!("{} documents, {} missing", report.total_documents, report.missing.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod classify;
pub mod completeness;
pub mod error;
pub mod verify;

pub use aggregate::{Analyzer, AnalyzerConfig, CancelToken, Progress};
pub use classify::{AmountFormat, AmountRules};
pub use error::AnalysisError;
