//! Atomic rename of a staged temp file into its final destination.
//! Collision handling upstream guarantees the destination is free, so the
//! rename never needs to overwrite. On Unix the destination directory is
//! fsynced afterwards so the rename survives power loss.

use std::fs;
use std::io;
use std::path::Path;

pub(super) fn atomic_rename(src: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(src, dst)?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = crate::utils::fsync_dir(parent);
    }

    Ok(())
}
