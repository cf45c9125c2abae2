//! Directory walker built on walkdir with deterministic ordering.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and yielding every regular file. Traversal is single-threaded and
//! visits directory entries in sorted name order, so the same tree always
//! produces the same file order within a run. That determinism matters:
//! the first file discovered in a duplicate group is the copy that gets
//! kept.
//!
//! # Features
//!
//! - Sorted, deterministic traversal order
//! - Gitignore-style pattern matching via the `ignore` crate
//! - Size filtering (min/max)
//! - Hidden file filtering
//!
//! Symlinks are not followed; only regular files are yielded.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::WalkDir;

use super::{ScanError, WalkerConfig};

/// Directory walker for deterministic file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

/// Validate that the supplied root path exists and is a directory.
///
/// This is the only fatal pre-scan check: an invalid root aborts before
/// any scanning happens.
///
/// # Errors
///
/// Returns [`ScanError::NotFound`] or [`ScanError::NotADirectory`].
pub fn validate_root(path: &Path) -> Result<(), ScanError> {
    if !path.exists() {
        return Err(ScanError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Build an ignore matcher from the configured patterns.
    ///
    /// Only explicit patterns are applied; `.gitignore` files in the tree
    /// are never loaded implicitly.
    fn build_ignore_matcher(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(matcher) if !matcher.is_empty() => Some(matcher),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Check if a path matches the configured ignore patterns.
    fn should_ignore(&self, path: &Path, is_dir: bool, matcher: &Option<Gitignore>) -> bool {
        let Some(matcher) = matcher else {
            return false;
        };

        // Gitignore matching expects paths relative to the root and
        // forward slashes even on Windows.
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();
        let normalized = if cfg!(windows) {
            path_str.replace('\\', "/")
        } else {
            path_str.into_owned()
        };

        matcher.matched(normalized, is_dir).is_ignore()
    }

    /// Check if a name is hidden (starts with `.`).
    fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
    }

    /// Check if a file passes size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if let Some(min) = self.config.min_size {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Walk the directory tree, yielding regular file paths.
    ///
    /// Returns an iterator over path results. Errors for individual
    /// entries are yielded as [`ScanError`] values rather than stopping
    /// iteration, so one unreadable directory never aborts the scan.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let matcher = self.build_ignore_matcher();

        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                // Never filter out the root itself
                if entry.path() == self.root {
                    return true;
                }
                if self.config.skip_hidden && Self::is_hidden(entry.path()) {
                    log::trace!("Skipping hidden entry: {}", entry.path().display());
                    return false;
                }
                if self.should_ignore(entry.path(), entry.file_type().is_dir(), &matcher) {
                    log::trace!("Ignoring entry: {}", entry.path().display());
                    return false;
                }
                true
            })
            .filter_map(move |entry_result| {
                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(self.convert_error(e))),
                };

                // Only regular files; directories and symlinks are skipped
                if !entry.file_type().is_file() {
                    return None;
                }

                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(e) => return Some(Err(self.convert_error(e))),
                };

                if !self.passes_size_filter(metadata.len()) {
                    log::trace!(
                        "Size filter excluded {} ({} bytes)",
                        entry.path().display(),
                        metadata.len()
                    );
                    return None;
                }

                Some(Ok(entry.into_path()))
            })
    }

    /// Convert a walkdir error into a typed [`ScanError`].
    fn convert_error(&self, err: walkdir::Error) -> ScanError {
        let path = err
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match err.io_error().map(std::io::Error::kind) {
            Some(std::io::ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
            Some(std::io::ErrorKind::NotFound) => ScanError::NotFound(path),
            _ => ScanError::Io {
                path,
                source: err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk error")),
            },
        }
    }
}
