//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Deterministic single-threaded directory walking via walkdir
//! - Streaming SHA-256 content hashing
//! - Ignore-pattern and size filtering
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("found {}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{hash_file, DIGEST_HEX_LEN};
pub use walker::{validate_root, Walker};

/// A scanned file together with its computed content digest.
///
/// Created during the scan pass, immutable once computed, and consumed
/// by digest grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercase hex SHA-256 digest of the full content
    pub digest: String,
}

impl FileRecord {
    /// Create a new FileRecord.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `digest` - Lowercase hex content digest
    #[must_use]
    pub fn new(path: PathBuf, size: u64, digest: String) -> Self {
        debug_assert_eq!(
            digest.len(),
            DIGEST_HEX_LEN,
            "digest must be {} hex chars",
            DIGEST_HEX_LEN
        );
        Self { path, size, digest }
    }
}

/// Configuration for directory walking.
///
/// Controls filtering behavior. The defaults enumerate every regular
/// file in the tree.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    /// Files smaller than this are skipped.
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes).
    /// Files larger than this are skipped.
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (gitignore-style).
    pub ignore_patterns: Vec<String>,
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    #[must_use]
    pub fn new(
        skip_hidden: bool,
        min_size: Option<u64>,
        max_size: Option<u64>,
        ignore_patterns: Vec<String>,
    ) -> Self {
        Self {
            skip_hidden,
            min_size,
            max_size,
            ignore_patterns,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified root path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified root path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
///
/// A per-file hash failure never aborts a scan; the caller reports it
/// and excludes the single file from grouping.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found (e.g. it vanished mid-scan).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
