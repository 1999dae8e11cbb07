use thiserror::Error;

/// Run-level failures. Anything scoped to a single document degrades that
/// document and lands in the report's warnings list instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Archive unreadable: {0}")]
    CorruptArchive(#[from] archive_reader::ArchiveError),

    #[error("Analysis cancelled")]
    Cancelled,
}
