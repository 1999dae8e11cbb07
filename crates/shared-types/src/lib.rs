pub mod checklist;
pub mod report;
pub mod types;

pub use checklist::{ChecklistSpec, DocSelector, PairSpec};
pub use report::{
    AnalysisReport, AnalysisWarning, MissingFilesResult, Summary, VerificationResult,
    VerificationStatus, WarningKind,
};
pub use types::{DocumentKind, DocumentRecord};
