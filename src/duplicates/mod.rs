//! Duplicate grouping by content digest.
//!
//! # Overview
//!
//! This module turns the scanner's file stream into duplicate sets: every
//! regular file under the root is hashed, paths are grouped by digest in
//! discovery order, and only groups with two or more members survive.
//!
//! The scan is strictly build-then-freeze: [`grouper::scan_tree`] owns the
//! digest map while it runs and returns a completed, immutable `Vec` of
//! [`DuplicateGroup`]s. Nothing streams out mid-scan.

pub mod grouper;

use std::path::{Path, PathBuf};

pub use grouper::scan_tree;

/// A confirmed set of files sharing one content digest.
///
/// Paths are in scan-discovery order; the first path is the copy that is
/// kept untouched during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Lowercase hex SHA-256 digest shared by every file in the group
    pub digest: String,
    /// File size in bytes (identical content implies identical size)
    pub size: u64,
    /// Member paths in discovery order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(digest: String, size: u64, paths: Vec<PathBuf>) -> Self {
        Self {
            digest,
            size,
            paths,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The kept path: the first discovered member, never acted upon.
    ///
    /// # Panics
    ///
    /// Panics if the group is empty; `scan_tree` never produces one.
    #[must_use]
    pub fn kept(&self) -> &Path {
        &self.paths[0]
    }

    /// The members that need a resolution decision (everything after the
    /// kept path).
    #[must_use]
    pub fn duplicates(&self) -> &[PathBuf] {
        &self.paths[1..]
    }

    /// Number of duplicate copies (total - 1 kept).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes that would be reclaimed by removing every copy but the kept one.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}

/// Statistics from a whole-tree scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of files enumerated by the walker
    pub total_files: usize,
    /// Number of files successfully hashed
    pub hashed_files: usize,
    /// Number of files excluded because they could not be read or hashed
    pub read_failures: usize,
    /// Number of duplicate sets (groups with 2+ members)
    pub duplicate_groups: usize,
    /// Number of files that are members of a duplicate set
    pub duplicate_files: usize,
    /// Bytes reclaimable if every duplicate copy were removed
    pub wasted_bytes: u64,
}

impl ScanSummary {
    /// True when at least one file was excluded by a read failure.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.read_failures > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_of(paths: &[&str], size: u64) -> DuplicateGroup {
        DuplicateGroup::new(
            "f".repeat(64),
            size,
            paths.iter().map(PathBuf::from).collect(),
        )
    }

    #[test]
    fn test_kept_is_first_discovered() {
        let group = group_of(&["/scan/a.txt", "/scan/b.txt", "/scan/c.txt"], 5);

        assert_eq!(group.kept(), Path::new("/scan/a.txt"));
        assert_eq!(
            group.duplicates(),
            &[PathBuf::from("/scan/b.txt"), PathBuf::from("/scan/c.txt")]
        );
    }

    #[test]
    fn test_duplicate_count_and_wasted_space() {
        let group = group_of(&["/a", "/b", "/c"], 1000);

        assert_eq!(group.len(), 3);
        assert_eq!(group.duplicate_count(), 2);
        assert_eq!(group.wasted_space(), 2000);
    }

    #[test]
    fn test_zero_byte_group_wastes_nothing() {
        let group = group_of(&["/a", "/b"], 0);
        assert_eq!(group.wasted_space(), 0);
    }

    #[test]
    fn test_summary_partial() {
        let mut summary = ScanSummary::default();
        assert!(!summary.is_partial());

        summary.read_failures = 1;
        assert!(summary.is_partial());
    }
}
