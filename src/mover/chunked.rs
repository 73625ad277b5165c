//! Copy strategies.
//!
//! Small files go through a direct `fs::copy`. Large files stream through a
//! bounded buffer into a hidden temp file in the destination directory and
//! are atomically renamed into place, so an interrupted copy never leaves a
//! half-written file that could be mistaken for a completed destination.
//! The streaming loop checks the shutdown flag between chunks.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::mover::atomic::atomic_rename;
use crate::shutdown;
use crate::utils::unique_temp_path;

/// Bounded copy buffer for the chunked path.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Direct copy for files below the chunking threshold.
pub(super) fn copy_direct(src: &Path, dest: &Path) -> io::Result<u64> {
    std::fs::copy(src, dest)
}

/// Chunked, bounded-buffer copy staged through a temp file.
pub(super) fn copy_chunked(src: &Path, dest: &Path) -> io::Result<u64> {
    let dir = dest.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent")
    })?;
    let tmp = unique_temp_path(dir);

    let bytes = match copy_streaming(src, &tmp) {
        Ok(b) => b,
        Err(e) => {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
    };

    if let Err(e) = atomic_rename(&tmp, dest) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    debug!(dest = %dest.display(), bytes, "chunked copy committed");
    Ok(bytes)
}

/// Stream `src` into a freshly created `tmp`, fsyncing before returning.
/// `create_new` guarantees we never clobber an existing file.
fn copy_streaming(src: &Path, tmp: &Path) -> io::Result<u64> {
    let mut reader = File::open(src)?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(tmp)?;

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        if shutdown::is_requested() {
            return Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "shutdown requested during copy",
            ));
        }
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }

    writer.flush()?;
    writer.sync_all()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn chunked_copy_crosses_buffer_boundaries() {
        let td = tempdir().unwrap();
        let src = td.path().join("big.bin");
        let dst = td.path().join("big.out");

        let size = 2 * CHUNK_SIZE + 123;
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        fs::write(&src, &data).unwrap();

        let n = copy_chunked(&src, &dst).unwrap();
        assert_eq!(n as usize, size);
        assert_eq!(fs::read(&dst).unwrap(), data);
    }

    #[test]
    fn chunked_copy_leaves_no_temp_behind() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.bin");
        let dst = td.path().join("b.bin");
        fs::write(&src, vec![1u8; CHUNK_SIZE / 2]).unwrap();

        copy_chunked(&src, &dst).unwrap();

        let leftovers: Vec<_> = fs::read_dir(td.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|n| n.starts_with(".tidy_move."))
            })
            .collect();
        assert!(leftovers.is_empty(), "orphan temps: {leftovers:?}");
    }

    #[test]
    fn streaming_refuses_existing_target() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let tmp = td.path().join("taken");
        fs::write(&src, b"data").unwrap();
        fs::write(&tmp, b"x").unwrap();

        let err = copy_streaming(&src, &tmp).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn copy_zero_length_ok() {
        let td = tempdir().unwrap();
        let src = td.path().join("empty");
        let dst = td.path().join("out");
        File::create(&src).unwrap();

        let n = copy_chunked(&src, &dst).unwrap();
        assert_eq!(n, 0);
        assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
    }
}
