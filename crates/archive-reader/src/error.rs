use thiserror::Error;

/// Container-level failure. Always fatal for the run.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Corrupt archive: {0}")]
    Corrupt(String),

    #[error("I/O error reading archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Entry-level failure. Callers skip the entry and continue.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Unsupported entry {path}: {reason}")]
    Unsupported { path: String, reason: String },

    #[error("Unreadable entry {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

impl EntryError {
    pub fn path(&self) -> &str {
        match self {
            EntryError::Unsupported { path, .. } | EntryError::Unreadable { path, .. } => path,
        }
    }
}
