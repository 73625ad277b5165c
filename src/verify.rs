//! Copy integrity verification.
//! Streams files through SHA-256 in fixed-size blocks so memory stays bounded
//! regardless of file size, and compares size/hash between source and copy.
//!
//! Every failure path returns `false` (or a sentinel digest) and logs the
//! reason, so callers branch deterministically instead of handling errors.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::shutdown;

/// Block size for streaming hash reads.
pub const HASH_BLOCK_SIZE: usize = 4096;

/// Files at or above this size are accepted on size equality alone;
/// hashing both sides of a multi-gigabyte move costs more than it protects.
pub const HASH_THRESHOLD_BYTES: u64 = 10 * 1024 * 1024;

/// Hex SHA-256 digest of a file's contents, streamed block by block.
/// Returns an empty sentinel string on read failure (logged), never an error.
pub fn hash_file(path: &Path) -> String {
    match hash_file_inner(path) {
        Ok(digest) => digest,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "hash failed; returning sentinel digest");
            String::new()
        }
    }
}

fn hash_file_inner(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut block = [0u8; HASH_BLOCK_SIZE];
    loop {
        if shutdown::is_requested() {
            return Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "shutdown requested during hash",
            ));
        }
        let n = file.read(&mut block)?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Decide whether `destination` is a trustworthy copy of `source`.
///
/// 1. Destination must exist.
/// 2. Sizes must match.
/// 3. Below [`HASH_THRESHOLD_BYTES`] the SHA-256 digests must also match.
pub fn verify_copy(source: &Path, destination: &Path) -> bool {
    if !destination.exists() {
        warn!(destination = %destination.display(), "verify: destination missing");
        return false;
    }

    let (src_len, dst_len) = match (fs::metadata(source), fs::metadata(destination)) {
        (Ok(s), Ok(d)) => (s.len(), d.len()),
        (Err(e), _) => {
            warn!(path = %source.display(), error = %e, "verify: cannot stat source");
            return false;
        }
        (_, Err(e)) => {
            warn!(path = %destination.display(), error = %e, "verify: cannot stat destination");
            return false;
        }
    };

    if src_len != dst_len {
        warn!(
            source = %source.display(),
            destination = %destination.display(),
            src_len,
            dst_len,
            "verify: size mismatch"
        );
        return false;
    }

    if src_len >= HASH_THRESHOLD_BYTES {
        debug!(
            source = %source.display(),
            size = src_len,
            "verify: above hash threshold, accepting on size equality"
        );
        return true;
    }

    let src_hash = hash_file(source);
    let dst_hash = hash_file(destination);
    if src_hash.is_empty() || dst_hash.is_empty() {
        // Sentinel digest means a read failed; never trust an unreadable side.
        return false;
    }
    if src_hash != dst_hash {
        warn!(
            source = %source.display(),
            destination = %destination.display(),
            "verify: hash mismatch"
        );
        return false;
    }
    true
}
