//! Small filesystem helpers shared by the mover, backup and rollback layers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Seconds since the Unix epoch; 0 if the clock is before the epoch.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Idempotent recursive directory creation.
/// Must not error when a racing caller creates the directory first;
/// `create_dir_all` already treats an existing directory as success.
pub fn ensure_directory(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Return a collision-free destination by splicing a unix timestamp into the
/// filename stem when the candidate already exists.
/// - Preserves non-UTF8 names (uses OsString).
/// - Format: "<stem>_<secs>[_<n>].<ext?>"
/// - Adds a tiny retry loop for same-second collisions.
pub(crate) fn timestamped_destination(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let ts = unix_timestamp();

    // Extract stem and extension robustly (handles dotfiles and non-UTF8).
    let stem = candidate
        .file_stem()
        .map(|s| s.to_owned())
        .unwrap_or_else(|| std::ffi::OsStr::new("file").to_owned());
    let ext = candidate.extension().map(|e| e.to_owned());

    let build = |suffix: &str| {
        let mut name = std::ffi::OsString::new();
        name.push(&stem);
        name.push(format!("_{ts}{suffix}"));
        if let Some(ref e) = ext {
            name.push(".");
            name.push(e);
        }
        candidate.with_file_name(name)
    };

    let dest = build("");
    if !dest.exists() {
        return dest;
    }

    for n in 2u32..=5 {
        let alt = build(&format!("_{n}"));
        if !alt.exists() {
            return alt;
        }
    }

    // Final fallback: pid makes the name unique across racing processes.
    build(&format!("_{}", std::process::id()))
}

/// Name prefix used for staged chunked copies; reconciliation keys off it.
pub(crate) const TEMP_PREFIX: &str = ".tidy_move.";

/// Allocate a hidden transient file name inside `dir` for staged chunked copies.
pub(crate) fn unique_temp_path(dir: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    dir.join(format!("{TEMP_PREFIX}{}-{millis}.tmp", std::process::id()))
}

/// Fsync a directory so a just-renamed entry survives power loss (Unix only).
#[cfg(unix)]
pub(crate) fn fsync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}
