//! Startup reconciliation.
//! A crash mid-chunked-copy can leave a staged `.tidy_move.*.tmp` file in the
//! destination directory. These are removed before new work so they are never
//! mistaken for real content. Runs automatically ahead of each move.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::utils::TEMP_PREFIX;

fn is_staged_temp(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with(TEMP_PREFIX) && name.ends_with(".tmp"))
}

/// Remove orphaned staged temp files from `dir`. Returns the number removed.
pub fn clean_orphan_temps(dir: &Path) -> usize {
    let Ok(rd) = fs::read_dir(dir) else {
        return 0;
    };
    let mut removed = 0;
    for ent in rd.flatten() {
        let p = ent.path();
        if p.is_file() && is_staged_temp(&p) {
            match fs::remove_file(&p) {
                Ok(()) => {
                    debug!(path = %p.display(), "Removed orphan staged temp");
                    removed += 1;
                }
                Err(e) => {
                    warn!(error = %e, path = %p.display(), "Failed to remove orphan staged temp")
                }
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_only_staged_temps() {
        let td = tempdir().unwrap();
        let orphan = td.path().join(".tidy_move.42-1700000000000.tmp");
        let real = td.path().join("keep.txt");
        fs::write(&orphan, b"partial").unwrap();
        fs::write(&real, b"data").unwrap();

        let removed = clean_orphan_temps(td.path());

        assert_eq!(removed, 1);
        assert!(!orphan.exists());
        assert!(real.exists());
    }

    #[test]
    fn missing_dir_is_a_no_op() {
        let td = tempdir().unwrap();
        assert_eq!(clean_orphan_temps(&td.path().join("nope")), 0);
    }
}
