//! Metadata preservation.
//! Optionally copies permissions and timestamps from source to destination.
//! Best-effort: preservation failures are logged, never fatal, since the
//! verified content is already in place.

use std::fs;
use std::path::Path;

use filetime::{FileTime, set_file_times};
use tracing::debug;

pub(super) fn maybe_preserve_metadata(src: &Path, dest: &Path, preserve: bool) {
    if !preserve {
        return;
    }

    let Ok(meta) = fs::metadata(src) else {
        debug!(source = %src.display(), "metadata preservation skipped: cannot stat source");
        return;
    };

    let atime = meta.accessed().ok().map(FileTime::from_system_time);
    let mtime = meta.modified().ok().map(FileTime::from_system_time);
    if let (Some(at), Some(mt)) = (atime, mtime) {
        let _ = set_file_times(dest, at, mt);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = meta.permissions().mode() & 0o777;
        if let Ok(dest_meta) = fs::metadata(dest) {
            let mut perms = dest_meta.permissions();
            perms.set_mode(mode);
            let _ = fs::set_permissions(dest, perms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn preserves_mode_and_mtime() {
        use std::os::unix::fs::PermissionsExt;

        let td = tempdir().unwrap();
        let src = td.path().join("src.txt");
        let dst = td.path().join("dst.txt");
        fs::write(&src, b"m").unwrap();
        fs::write(&dst, b"m").unwrap();

        fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();
        let ts = FileTime::from_unix_time(1_700_000_000, 0);
        filetime::set_file_mtime(&src, ts).unwrap();

        maybe_preserve_metadata(&src, &dst, true);

        let dst_meta = fs::metadata(&dst).unwrap();
        assert_eq!(dst_meta.permissions().mode() & 0o777, 0o640);
        let dst_mtime = FileTime::from_last_modification_time(&dst_meta);
        assert_eq!(dst_mtime.unix_seconds(), ts.unix_seconds());
    }

    #[test]
    fn disabled_flag_is_a_no_op() {
        let td = tempdir().unwrap();
        let src = td.path().join("s");
        let dst = td.path().join("d");
        fs::write(&src, b"1").unwrap();
        fs::write(&dst, b"1").unwrap();
        maybe_preserve_metadata(&src, &dst, false);
    }
}
