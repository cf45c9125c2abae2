//! Whole-tree scan: walk, hash, and group by digest.
//!
//! # Overview
//!
//! [`scan_tree`] drives the walker and hasher over a validated root
//! directory and builds the digest → paths map. The whole tree is
//! processed before anything is returned; the caller receives a frozen
//! list of duplicate sets plus a [`ScanSummary`].
//!
//! Per-file failures (a file vanished between enumeration and hashing,
//! permission revoked, locked by another process) are logged, counted in
//! the summary, and excluded from grouping. One unreadable file never
//! stops the scan.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::scanner::{hash_file, FileRecord, Walker, WalkerConfig};

use super::{DuplicateGroup, ScanSummary};

/// Scan a directory tree and group files by content digest.
///
/// The root must already be validated with
/// [`crate::scanner::validate_root`]. Enumeration order is the walker's
/// deterministic sorted order, which fixes both the path order inside
/// each group and the group emission order (first discovery of each
/// digest).
///
/// Only groups with two or more members are returned; singleton digests
/// are discarded.
#[must_use]
pub fn scan_tree(root: &Path, config: &WalkerConfig) -> (Vec<DuplicateGroup>, ScanSummary) {
    let walker = Walker::new(root, config.clone());
    let mut summary = ScanSummary::default();

    // digest -> ordered member records; discovery_order remembers the
    // first time each digest was seen so group output stays deterministic.
    let mut by_digest: HashMap<String, Vec<FileRecord>> = HashMap::new();
    let mut discovery_order: Vec<String> = Vec::new();

    for entry in walker.walk() {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Could not access entry: {}", e);
                summary.read_failures += 1;
                continue;
            }
        };

        summary.total_files += 1;

        let digest = match hash_file(&path) {
            Ok(digest) => digest,
            Err(e) => {
                log::warn!("Could not hash file: {}", e);
                summary.read_failures += 1;
                continue;
            }
        };

        // Size is for reporting only and never affects grouping.
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let record = FileRecord::new(path, size, digest.clone());

        summary.hashed_files += 1;

        match by_digest.get_mut(&digest) {
            Some(records) => records.push(record),
            None => {
                discovery_order.push(digest.clone());
                by_digest.insert(digest, vec![record]);
            }
        }
    }

    let mut groups = Vec::new();
    for digest in discovery_order {
        let records = by_digest
            .remove(&digest)
            .unwrap_or_default();
        if records.len() < 2 {
            continue;
        }

        let size = records[0].size;
        let paths = records.into_iter().map(|r| r.path).collect();
        let group = DuplicateGroup::new(digest, size, paths);

        summary.duplicate_groups += 1;
        summary.duplicate_files += group.len();
        summary.wasted_bytes += group.wasted_space();
        groups.push(group);
    }

    log::info!(
        "Scan complete: {} files hashed, {} read failures, {} duplicate set(s)",
        summary.hashed_files,
        summary.read_failures,
        summary.duplicate_groups
    );

    (groups, summary)
}
