use std::fs;
use std::path::Path;

use tempfile::TempDir;
use vidsweep::duplicates::{DedupConfig, Deduplicator};
use vidsweep::scanner::{OrderPolicy, WalkerConfig};

fn populate(root: &Path) {
    // Created in reverse name order so native order is unlikely to match
    for name in ["z.mp4", "m.mp4", "c.mp4", "a/inner.mp4"] {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"same").unwrap();
    }
}

#[test]
fn test_name_order_survivor_is_reproducible() {
    for _ in 0..3 {
        let dir = TempDir::new().unwrap();
        populate(dir.path());

        let report = Deduplicator::with_defaults().sweep(dir.path()).unwrap();

        assert_eq!(report.survivors, vec![dir.path().join("a").join("inner.mp4")]);
        assert_eq!(report.removed.len(), 3);
    }
}

#[test]
fn test_native_order_keeps_exactly_one() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());

    let config = DedupConfig::default().with_walker_config(WalkerConfig {
        order: OrderPolicy::Native,
        ..Default::default()
    });
    let report = Deduplicator::new(config).sweep(dir.path()).unwrap();

    assert_eq!(report.survivors.len(), 1);
    assert_eq!(report.removed.len(), 3);
    assert!(report.survivors[0].exists());
}

#[test]
fn test_skip_hidden_leaves_hidden_copies() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.mp4"), b"same").unwrap();
    fs::write(dir.path().join(".b.mp4"), b"same").unwrap();

    let config = DedupConfig::default().with_walker_config(WalkerConfig {
        skip_hidden: true,
        ..Default::default()
    });
    let report = Deduplicator::new(config).sweep(dir.path()).unwrap();

    assert!(report.removed.is_empty());
    assert!(dir.path().join(".b.mp4").exists());
}
