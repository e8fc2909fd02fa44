use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vidsweep::duplicates::{DedupConfig, Deduplicator, FileError};
use vidsweep::scanner::{ExtensionFilter, HashAlgorithm, HashError};

fn write(root: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn remaining(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = walkdir_names(root);
    names.sort();
    names
}

fn walkdir_names(root: &Path) -> Vec<String> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.is_dir() {
            for nested in walkdir_names(&path) {
                names.push(format!("{}/{}", entry.file_name().to_string_lossy(), nested));
            }
        } else {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names
}

// ==================== Scenario Tests ====================

#[test]
fn test_scenario_identical_pair() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.mp4", b"identical bytes");
    write(dir.path(), "b.mp4", b"identical bytes");

    let report = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

    assert_eq!(remaining(dir.path()), vec!["a.mp4"]);
    assert_eq!(report.removed.len(), 1);
    assert_eq!(report.removed[0].path.file_name().unwrap(), "b.mp4");
}

#[test]
fn test_scenario_mixed_extensions() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.mp4", b"same");
    write(dir.path(), "b.mkv", b"same");
    write(dir.path(), "c.txt", b"same");

    let report = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

    assert_eq!(remaining(dir.path()), vec!["a.mp4", "c.txt"]);
    assert_eq!(report.skipped_by_extension, 1);
    assert_eq!(report.candidates, 2);
    assert_eq!(report.removed.len(), 1);
}

#[test]
fn test_scenario_all_distinct() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "one.mp4", b"1");
    write(dir.path(), "two.avi", b"2");
    write(dir.path(), "three.mov", b"3");

    let report = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

    assert_eq!(remaining(dir.path()).len(), 3);
    assert!(report.removed.is_empty());
    assert_eq!(report.unique_digests, 3);
    assert_eq!(report.survivors.len(), 3);
}

#[test]
fn test_uppercase_extensions_are_candidates() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A.MP4", b"same");
    write(dir.path(), "B.Mkv", b"same");

    let report = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

    assert_eq!(remaining(dir.path()), vec!["A.MP4"]);
    assert_eq!(report.candidates, 2);
}

#[test]
fn test_bare_dot_video_name_is_a_candidate() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.mp4", b"same bytes");
    let copy = write(dir.path(), "sub/.mp4", b"same bytes");

    let report = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

    assert_eq!(report.candidates, 2);
    assert_eq!(report.skipped_by_extension, 0);
    assert!(!copy.exists());
    assert_eq!(remaining(dir.path()), vec!["a.mp4"]);
    assert_eq!(report.removed[0].path.file_name().unwrap(), ".mp4");
}

#[test]
fn test_nested_tree_keeps_one_copy_per_content() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "2023/jan/clip.mp4", b"clip");
    write(dir.path(), "2023/feb/clip.mp4", b"clip");
    write(dir.path(), "2024/clip-copy.mkv", b"clip");
    write(dir.path(), "2024/other.flv", b"other");
    write(dir.path(), "backup/other.flv", b"other");

    let report = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

    assert_eq!(
        remaining(dir.path()),
        vec!["2023/feb/clip.mp4", "2024/other.flv"]
    );
    assert_eq!(report.removed.len(), 3);
    assert_eq!(report.bytes_reclaimed, 4 + 4 + 5);
}

#[test]
fn test_second_sweep_removes_nothing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.mp4", b"x");
    write(dir.path(), "b.mp4", b"x");
    write(dir.path(), "c.mp4", b"y");

    let first = Deduplicator::with_defaults().sweep(dir.path()).unwrap();
    let second = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

    assert_eq!(first.removed.len(), 1);
    assert!(second.removed.is_empty());
    assert_eq!(second.survivors, first.survivors);
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.mp4", b"");
    write(dir.path(), "b.mp4", b"");

    let report = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

    assert_eq!(remaining(dir.path()), vec!["a.mp4"]);
    assert_eq!(report.bytes_reclaimed, 0);
}

// ==================== Configuration Tests ====================

#[test]
fn test_every_algorithm_makes_the_same_decisions() {
    for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.mp4", b"same");
        write(dir.path(), "b.mp4", b"same");
        write(dir.path(), "c.mp4", b"different");

        let dedup = Deduplicator::new(DedupConfig::default().with_algorithm(algorithm));
        let report = dedup.sweep(dir.path()).unwrap();

        assert_eq!(remaining(dir.path()), vec!["a.mp4", "c.mp4"], "{algorithm}");
        assert_eq!(report.unique_digests, 2);
    }
}

#[test]
fn test_small_chunk_size_same_result() {
    let dir = TempDir::new().unwrap();
    let content = vec![7u8; 10_000];
    write(dir.path(), "a.mp4", &content);
    write(dir.path(), "b.mp4", &content);

    let dedup = Deduplicator::new(DedupConfig::default().with_chunk_size(7));
    let report = dedup.sweep(dir.path()).unwrap();

    assert_eq!(report.removed.len(), 1);
}

#[test]
fn test_custom_extensions_replace_defaults() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.webm", b"same");
    write(dir.path(), "b.webm", b"same");
    write(dir.path(), "c.mp4", b"same");

    let dedup = Deduplicator::new(
        DedupConfig::default().with_extensions(ExtensionFilter::new([".WEBM"])),
    );
    let report = dedup.sweep(dir.path()).unwrap();

    assert_eq!(remaining(dir.path()), vec!["a.webm", "c.mp4"]);
    assert_eq!(report.skipped_by_extension, 1);
}

#[test]
fn test_dry_run_reports_same_decisions() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.mp4", b"same");
    write(dir.path(), "b.mp4", b"same");
    write(dir.path(), "c.mp4", b"same");

    let dedup = Deduplicator::new(DedupConfig::default().with_dry_run(true));
    let report = dedup.sweep(dir.path()).unwrap();

    assert_eq!(remaining(dir.path()).len(), 3);
    let would_remove: Vec<_> = report
        .removed
        .iter()
        .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(would_remove, vec!["b.mp4", "c.mp4"]);
}

#[test]
fn test_parallel_sweep_on_many_files() {
    let dir = TempDir::new().unwrap();
    for i in 0..60 {
        let content = format!("content-{}", i % 7);
        write(dir.path(), &format!("v{i:03}.mp4"), content.as_bytes());
    }

    let dedup = Deduplicator::new(DedupConfig::default().with_io_threads(8));
    let report = dedup.sweep(dir.path()).unwrap();

    let expected: Vec<String> = (0..7).map(|i| format!("v{i:03}.mp4")).collect();
    assert_eq!(remaining(dir.path()), expected);
    assert_eq!(report.removed.len(), 53);
}

// ==================== Error Continuation Tests ====================

#[test]
fn test_missing_files_do_not_stop_the_sweep() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.mp4", b"same");
    let b = write(dir.path(), "b.mp4", b"same");

    let report = Deduplicator::with_defaults().run_paths(vec![
        dir.path().join("gone-1.mp4"),
        a.clone(),
        dir.path().join("gone-2.mkv"),
        b.clone(),
    ]);

    assert!(a.exists());
    assert!(!b.exists());
    assert_eq!(report.errors.len(), 2);
    for error in &report.errors {
        assert!(matches!(error, FileError::Hash(HashError::NotFound(_))));
    }
}

#[test]
fn test_missing_non_video_is_not_an_error() {
    let dir = TempDir::new().unwrap();

    let report = Deduplicator::with_defaults().run_paths(vec![dir.path().join("ghost.txt")]);

    assert!(report.errors.is_empty());
    assert_eq!(report.skipped_by_extension, 1);
}

#[test]
fn test_failed_hash_never_becomes_survivor() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.mp4", b"same");

    let report = Deduplicator::with_defaults()
        .run_paths(vec![dir.path().join("gone.mp4"), a.clone()]);

    assert_eq!(report.survivors, vec![a]);
}
