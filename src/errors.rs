//! Typed error definitions for tidy_move.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TidyMoveError {
    #[error("I/O failure while {op} '{path}': {source}")]
    IoFailure {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("verification failed: '{source_path}' and '{destination_path}' differ")]
    VerificationFailure {
        source_path: PathBuf,
        destination_path: PathBuf,
    },

    #[error("journal failure: {0}")]
    JournalFailure(String),

    #[error("not found: {0}")]
    NotFound(PathBuf),
}

impl TidyMoveError {
    /// Wrap an io::Error with the operation and path it occurred on.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoFailure {
            op,
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code for structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoFailure { .. } => "io_failure",
            Self::VerificationFailure { .. } => "verification_failure",
            Self::JournalFailure(_) => "journal_failure",
            Self::NotFound(_) => "not_found",
        }
    }
}
