//! The backup → copy → verify → commit/cleanup state machine.
//!
//! Shared by forward moves and by undo/redo, which replay it with the paths
//! swapped. All filesystem failures are caught here and folded into the
//! returned [`MoveReport`]; nothing in this module panics or propagates
//! errors, so a batch of moves never aborts mid-run on one bad file.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::backup::BackupManager;
use crate::config::Config;
use crate::errors::TidyMoveError;
use crate::mover::{MoveOutcome, MoveReport, chunked, meta};
use crate::utils::{ensure_directory, timestamped_destination};
use crate::verify;

pub(crate) fn transfer_file(config: &Config, source: &Path, requested_dest: &Path) -> MoveReport {
    let mut report = MoveReport {
        outcome: MoveOutcome::IoError,
        source: source.to_path_buf(),
        destination: requested_dest.to_path_buf(),
        backup_path: None,
    };

    let src_len = match fs::metadata(source) {
        Ok(m) if m.is_file() => m.len(),
        Ok(_) => {
            warn!(source = %source.display(), "transfer aborted: source is not a regular file");
            return report;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let err = TidyMoveError::NotFound(source.to_path_buf());
            warn!(code = err.code(), "transfer aborted: {err}");
            return report;
        }
        Err(e) => {
            let err = TidyMoveError::io("stat source", source, e);
            warn!(code = err.code(), "transfer aborted: {err}");
            return report;
        }
    };

    // Best-effort safety net before anything destructive happens. A failed
    // backup is logged inside BackupManager and the move continues.
    report.backup_path = BackupManager::new(config).backup(source);

    let Some(parent) = requested_dest.parent() else {
        warn!(destination = %requested_dest.display(), "transfer aborted: destination has no parent directory");
        return report;
    };
    if let Err(e) = ensure_directory(parent) {
        warn!(dir = %parent.display(), error = %e, "transfer aborted: cannot create destination directory");
        return report;
    }

    // Never overwrite: an occupied destination gets a timestamped sibling name.
    let dest = timestamped_destination(requested_dest);
    if dest != requested_dest {
        info!(
            requested = %requested_dest.display(),
            renamed = %dest.display(),
            "destination occupied; using timestamped name"
        );
    }
    report.destination = dest.clone();

    let copy_result = if src_len >= verify::HASH_THRESHOLD_BYTES {
        debug!(source = %source.display(), size = src_len, "using chunked copy");
        chunked::copy_chunked(source, &dest)
    } else {
        chunked::copy_direct(source, &dest)
    };

    if let Err(e) = copy_result {
        let err = TidyMoveError::io("copy", &dest, e);
        warn!(code = err.code(), "copy failed, cleaning up destination: {err}");
        remove_quietly(&dest);
        return report;
    }

    if !verify::verify_copy(source, &dest) {
        let err = TidyMoveError::VerificationFailure {
            source_path: source.to_path_buf(),
            destination_path: dest.clone(),
        };
        warn!(code = err.code(), "{err}; destination removed, source intact");
        remove_quietly(&dest);
        report.outcome = MoveOutcome::VerificationFailed;
        return report;
    }

    meta::maybe_preserve_metadata(source, &dest, config.preserve_metadata);

    if let Err(e) = fs::remove_file(source) {
        // The copy verified but the source survived, so the move has not
        // committed. Remove the duplicate to keep the all-or-nothing contract.
        warn!(
            source = %source.display(),
            error = %e,
            "cannot delete source after verified copy; rolling the copy back"
        );
        remove_quietly(&dest);
        return report;
    }

    info!(
        source = %source.display(),
        destination = %dest.display(),
        bytes = src_len,
        "move committed"
    );
    report.outcome = MoveOutcome::Committed;
    report
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "cleanup of destination failed");
    }
}
