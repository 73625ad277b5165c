//! Durable, lock-guarded journal file.
//!
//! The journal is a JSON array of [`Operation`] records at a fixed path.
//! Every mutation is a full rewrite staged through a temp file and an atomic
//! rename; operation volume is bounded by interactive usage, so rewrite cost
//! is irrelevant next to the simplicity it buys.
//!
//! Writes hold an exclusive advisory lock (fs2) on a sidecar lock file for
//! their duration. If the lock cannot be acquired the write proceeds
//! unsynchronized and the degraded-safety mode is logged at WARN rather than
//! hidden.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::errors::TidyMoveError;
use crate::rollback::Operation;
use crate::utils::ensure_directory;

pub struct RollbackJournal {
    path: PathBuf,
}

/// Held for the duration of a journal write; unlocks on drop.
struct JournalLock {
    file: File,
}

impl Drop for JournalLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl RollbackJournal {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records. A missing journal is an empty one.
    pub fn load(&self) -> Result<Vec<Operation>, TidyMoveError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| TidyMoveError::io("read journal", &self.path, e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            TidyMoveError::JournalFailure(format!(
                "corrupt journal at '{}': {e}",
                self.path.display()
            ))
        })
    }

    /// Replace the journal contents with `ops`, atomically and under lock.
    pub fn rewrite(&self, ops: &[Operation]) -> Result<(), TidyMoveError> {
        if let Some(parent) = self.path.parent() {
            ensure_directory(parent)
                .map_err(|e| TidyMoveError::io("create journal directory", parent, e))?;
        }

        let _lock = self.acquire_lock();

        let json = serde_json::to_string_pretty(ops)
            .map_err(|e| TidyMoveError::JournalFailure(format!("serialize journal: {e}")))?;

        let tmp = self.path.with_extension("tmp");
        let mut file = File::create(&tmp).map_err(|e| TidyMoveError::io("stage journal", &tmp, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| TidyMoveError::io("write journal", &tmp, e))?;
        file.sync_all()
            .map_err(|e| TidyMoveError::io("sync journal", &tmp, e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            TidyMoveError::io("publish journal", &self.path, e)
        })?;

        #[cfg(unix)]
        if let Some(parent) = self.path.parent() {
            let _ = crate::utils::fsync_dir(parent);
        }

        debug!(path = %self.path.display(), records = ops.len(), "journal rewritten");
        Ok(())
    }

    /// Truncate the journal to an empty collection. Idempotent.
    pub fn clear(&self) -> Result<(), TidyMoveError> {
        self.rewrite(&[])
    }

    /// Exclusive advisory lock on the sidecar lock file. `None` means the
    /// platform refused the lock; the caller proceeds in degraded mode.
    fn acquire_lock(&self) -> Option<JournalLock> {
        let lock_path = self.lock_path();
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
        {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    path = %lock_path.display(),
                    error = %e,
                    "journal lock unavailable; writing without cross-process lock (degraded safety)"
                );
                return None;
            }
        };
        if let Err(e) = file.lock_exclusive() {
            warn!(
                path = %lock_path.display(),
                error = %e,
                "journal lock unavailable; writing without cross-process lock (degraded safety)"
            );
            return None;
        }
        Some(JournalLock { file })
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_owned()).unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mover::MoveOutcome;
    use crate::rollback::{OpState, OperationKind};
    use chrono::Utc;
    use tempfile::tempdir;

    fn op(src: &str, dst: &str) -> Operation {
        Operation {
            kind: OperationKind::Move,
            source_path: src.into(),
            destination_path: dst.into(),
            timestamp: Utc::now(),
            backup_path: None,
            outcome: MoveOutcome::Committed,
            state: OpState::Recorded,
        }
    }

    #[test]
    fn missing_journal_loads_empty() {
        let td = tempdir().unwrap();
        let j = RollbackJournal::open(td.path().join("rollback_log"));
        assert!(j.load().unwrap().is_empty());
    }

    #[test]
    fn rewrite_then_load_round_trips() {
        let td = tempdir().unwrap();
        let j = RollbackJournal::open(td.path().join("rollback_log"));
        j.rewrite(&[op("/a", "/b"), op("/c", "/d")]).unwrap();

        let got = j.load().unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[1].source_path, PathBuf::from("/c"));
    }

    #[test]
    fn clear_is_idempotent() {
        let td = tempdir().unwrap();
        let j = RollbackJournal::open(td.path().join("rollback_log"));
        j.rewrite(&[op("/a", "/b")]).unwrap();
        j.clear().unwrap();
        j.clear().unwrap();
        assert!(j.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_journal_is_a_journal_failure() {
        let td = tempdir().unwrap();
        let path = td.path().join("rollback_log");
        fs::write(&path, b"not json at all").unwrap();
        let j = RollbackJournal::open(&path);
        let err = j.load().unwrap_err();
        assert_eq!(err.code(), "journal_failure");
    }

    #[test]
    fn rewrite_leaves_no_staging_file() {
        let td = tempdir().unwrap();
        let j = RollbackJournal::open(td.path().join("rollback_log"));
        j.rewrite(&[op("/a", "/b")]).unwrap();
        assert!(!td.path().join("rollback_log.tmp").exists());
    }
}
