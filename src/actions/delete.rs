//! File deletion with classified errors.
//!
//! # Overview
//!
//! Deletes one duplicate file from the filesystem. Deletion is a single
//! attempt: a failure here is a terminal outcome for the file, reported
//! to the operator without a retry.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::actions::delete_file;
//! use std::path::Path;
//!
//! match delete_file(Path::new("/path/to/duplicate.txt")) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved since the scan).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
}

/// Delete a single file from the filesystem.
///
/// The file's size is captured before removal so callers can report the
/// bytes freed.
///
/// # Errors
///
/// Returns a [`DeleteError`] classifying the underlying `io::ErrorKind`.
pub fn delete_file(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| classify_error(path, e))?;

    fs::remove_file(path).map_err(|e| classify_error(path, e))?;

    log::debug!("Deleted {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
    })
}

fn classify_error(path: &Path, source: io::Error) -> DeleteError {
    match source.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
        _ => DeleteError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_delete_removes_file_and_reports_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doomed.txt");
        fs::write(&path, b"five!").unwrap();

        let result = delete_file(&path).unwrap();

        assert_eq!(result.size, 5);
        assert_eq!(result.path, path);
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ghost.txt");

        match delete_file(&path) {
            Err(DeleteError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_leaves_siblings_untouched() {
        let dir = tempdir().unwrap();
        let doomed = dir.path().join("doomed.txt");
        let kept = dir.path().join("kept.txt");
        fs::write(&doomed, b"same").unwrap();
        fs::write(&kept, b"same").unwrap();

        delete_file(&doomed).unwrap();

        assert!(!doomed.exists());
        assert!(kept.exists());
        assert_eq!(fs::read(&kept).unwrap(), b"same");
    }
}
