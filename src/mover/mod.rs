//! Transactional file relocation.
//!
//! A move runs backup → copy → verify → commit-or-cleanup and always ends in
//! one of four outcomes the caller can branch on. The source is only deleted
//! after the destination verified byte-trustworthy; a failed verification
//! removes the corrupt destination and leaves the source untouched.

mod atomic;
mod chunked;
mod meta;
pub(crate) mod transfer;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::ignore::IgnorePolicy;
use crate::rollback::{OperationKind, RollbackManager};

pub use chunked::CHUNK_SIZE;

/// Terminal state of a single move attempt. Call sites branch on this value;
/// the mover never surfaces raw errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Destination verified, source deleted.
    Committed,
    /// Copy completed but did not verify; destination removed, source intact.
    VerificationFailed,
    /// A filesystem step failed before or during the copy; source intact.
    IoError,
    /// Ignore policy or dry-run short-circuited the move; nothing touched.
    Skipped,
}

impl std::fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MoveOutcome::Committed => "committed",
            MoveOutcome::VerificationFailed => "verification_failed",
            MoveOutcome::IoError => "io_error",
            MoveOutcome::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// What a move attempt actually did. `destination` is the path really written,
/// which differs from the requested one when a collision was renamed around.
#[derive(Debug, Clone)]
pub struct MoveReport {
    pub outcome: MoveOutcome,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub backup_path: Option<PathBuf>,
}

impl MoveReport {
    pub fn committed(&self) -> bool {
        self.outcome == MoveOutcome::Committed
    }
}

/// Orchestrates single-file moves and reports every attempt to the rollback
/// ledger. Owns no persistent state of its own.
pub struct TransactionalMover<'a> {
    config: &'a Config,
    ignore: &'a dyn IgnorePolicy,
}

impl<'a> TransactionalMover<'a> {
    pub fn new(config: &'a Config, ignore: &'a dyn IgnorePolicy) -> Self {
        Self { config, ignore }
    }

    /// Move `source` to `destination` with copy-verify-delete semantics.
    ///
    /// Every attempt that gets past the ignore/dry-run gate is recorded in the
    /// rollback journal regardless of outcome, so the ledger doubles as an
    /// audit trail of what was tried.
    pub fn move_file(
        &self,
        source: &Path,
        destination: &Path,
        rollback: &mut RollbackManager,
    ) -> MoveReport {
        if self.ignore.should_ignore(source) {
            info!(source = %source.display(), "skipping ignored source");
            return MoveReport {
                outcome: MoveOutcome::Skipped,
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                backup_path: None,
            };
        }

        if self.config.dry_run {
            info!(
                source = %source.display(),
                destination = %destination.display(),
                "dry-run: would move file"
            );
            return MoveReport {
                outcome: MoveOutcome::Skipped,
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                backup_path: None,
            };
        }

        let report = transfer::transfer_file(self.config, source, destination);
        rollback.record_operation(OperationKind::Move, &report);
        report
    }
}
