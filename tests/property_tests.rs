use dupescan::duplicates::scan_tree;
use dupescan::scanner::{hash_file, WalkerConfig, DIGEST_HEX_LEN};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

proptest! {
    #[test]
    fn test_hash_determinism(content in prop::collection::vec(any::<u8>(), 0..4096)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        fs::write(&path, &content).unwrap();

        let hash1 = hash_file(&path).unwrap();
        let hash2 = hash_file(&path).unwrap();

        prop_assert_eq!(&hash1, &hash2);
        prop_assert_eq!(hash1.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn test_identical_content_identical_digest(content in prop::collection::vec(any::<u8>(), 0..4096)) {
        let dir = TempDir::new().unwrap();
        let path1 = dir.path().join("one.bin");
        let path2 = dir.path().join("two.bin");
        fs::write(&path1, &content).unwrap();
        fs::write(&path2, &content).unwrap();

        prop_assert_eq!(hash_file(&path1).unwrap(), hash_file(&path2).unwrap());
    }

    #[test]
    fn test_differing_content_differing_digest(
        content in prop::collection::vec(any::<u8>(), 1..2048),
        flip_index in any::<prop::sample::Index>(),
    ) {
        let dir = TempDir::new().unwrap();
        let path1 = dir.path().join("one.bin");
        let path2 = dir.path().join("two.bin");

        let mut altered = content.clone();
        let idx = flip_index.index(altered.len());
        altered[idx] ^= 0xFF;

        fs::write(&path1, &content).unwrap();
        fs::write(&path2, &altered).unwrap();

        prop_assert_ne!(hash_file(&path1).unwrap(), hash_file(&path2).unwrap());
    }

    #[test]
    fn test_scan_group_invariants(
        contents in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..256), 0..12)
    ) {
        let dir = TempDir::new().unwrap();
        for (i, content) in contents.iter().enumerate() {
            fs::write(dir.path().join(format!("f{i:02}.bin")), content).unwrap();
        }

        let (groups, summary) = scan_tree(dir.path(), &WalkerConfig::default());

        // Every group has at least two members and a consistent digest
        for group in &groups {
            prop_assert!(group.len() >= 2);
            for path in &group.paths {
                prop_assert_eq!(&hash_file(path).unwrap(), &group.digest);
            }
        }

        // No path appears in more than one group
        let mut seen = std::collections::HashSet::new();
        for group in &groups {
            for path in &group.paths {
                prop_assert!(seen.insert(path.clone()));
            }
        }

        prop_assert_eq!(summary.total_files, contents.len());
        prop_assert_eq!(summary.hashed_files, contents.len());

        let member_count: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(summary.duplicate_files, member_count);
    }
}
