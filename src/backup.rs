//! Best-effort timestamped backups.
//! Before a file is touched destructively, a copy lands under
//! `<data_dir>/backup/file_backups/<name>.<unix_ts>.bak`. Backup failure is
//! logged and reported as `None`; it never blocks the move itself.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::utils::{ensure_directory, unix_timestamp};

pub struct BackupManager {
    root: PathBuf,
}

impl BackupManager {
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.backup_root(),
        }
    }

    /// Copy `path` into the backup directory with a timestamp suffix.
    /// Returns the backup path on success, `None` on any failure (logged).
    pub fn backup(&self, path: &Path) -> Option<PathBuf> {
        let Some(name) = path.file_name() else {
            warn!(path = %path.display(), "backup skipped: source has no file name");
            return None;
        };

        if let Err(e) = ensure_directory(&self.root) {
            warn!(dir = %self.root.display(), error = %e, "backup skipped: cannot create backup directory");
            return None;
        }

        let dest = self.backup_path_for(name, unix_timestamp());
        match fs::copy(path, &dest) {
            Ok(bytes) => {
                debug!(source = %path.display(), backup = %dest.display(), bytes, "backup created");
                Some(dest)
            }
            Err(e) => {
                warn!(source = %path.display(), backup = %dest.display(), error = %e, "backup failed; continuing without one");
                None
            }
        }
    }

    fn backup_path_for(&self, name: &std::ffi::OsStr, ts: u64) -> PathBuf {
        let mut backup_name = OsString::from(name);
        backup_name.push(format!(".{ts}.bak"));
        let candidate = self.root.join(&backup_name);
        if !candidate.exists() {
            return candidate;
        }
        // Same-second backup of the same name: disambiguate with the pid.
        let mut alt = OsString::from(name);
        alt.push(format!(".{ts}-{}.bak", std::process::id()));
        self.root.join(alt)
    }
}
