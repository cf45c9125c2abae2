//! SHA-256 file hasher with streaming support.
//!
//! # Overview
//!
//! Computes a content digest for a single file by streaming it through
//! SHA-256 in fixed-size chunks, so memory use stays bounded regardless
//! of file size. The file handle is scoped to the call and is closed on
//! both the success and failure paths.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::hash_file;
//! use std::path::Path;
//!
//! let digest = hash_file(Path::new("/tmp/a.txt")).unwrap();
//! assert_eq!(digest.len(), 64);
//! ```

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::HashError;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Read buffer size for streaming hashing.
const READ_BUF_SIZE: usize = 64 * 1024;

/// Compute the SHA-256 digest of a file's full byte content.
///
/// The content is streamed, never buffered wholly in memory. Returns
/// the digest as a lowercase hex string of [`DIGEST_HEX_LEN`] characters.
///
/// # Errors
///
/// Returns a [`HashError`] if the file cannot be opened or read
/// (vanished mid-scan, permission denied, locked by another process).
pub fn hash_file(path: &Path) -> Result<String, HashError> {
    let file = File::open(path).map_err(|e| classify_error(path, e))?;
    let mut reader = BufReader::with_capacity(READ_BUF_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; READ_BUF_SIZE];

    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| classify_error(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Map an `io::Error` to a typed [`HashError`] for the given path.
fn classify_error(path: &Path, source: std::io::Error) -> HashError {
    match source.kind() {
        ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}
