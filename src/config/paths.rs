//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/data/log paths and detects symlinked
//! ancestors for safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dirs::{config_dir, data_dir};

/// OS-appropriate default config path.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(mut base) = config_dir() {
        base.push("tidy_move");
        base.push("config.xml");
        Some(base)
    } else {
        std::env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("tidy_move")
                .join("config.xml")
        })
    }
}

/// OS-appropriate default data directory (journal + backups).
pub fn default_data_dir() -> PathBuf {
    if let Some(mut base) = data_dir() {
        base.push("tidy_move");
        base
    } else {
        std::env::var("HOME")
            .map(|h| {
                PathBuf::from(h)
                    .join(".local")
                    .join("share")
                    .join("tidy_move")
            })
            .unwrap_or_else(|_| PathBuf::from(".tidy_move"))
    }
}

/// OS-appropriate default log file path (under the data dir).
pub fn default_log_path() -> PathBuf {
    default_data_dir().join("tidy_move.log")
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_data_dir_is_crate_scoped() {
        let dir = default_data_dir();
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.contains("tidy_move"), "got {name}");
    }

    #[cfg(unix)]
    #[test]
    fn detects_symlinked_ancestor() {
        let td = tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir_all(&real).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert!(path_has_symlink_ancestor(&link.join("file.log")).unwrap());
        assert!(!path_has_symlink_ancestor(&real.join("file.log")).unwrap());
    }
}
