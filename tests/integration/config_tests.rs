use std::fs;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tempfile::tempdir;
use vidsweep::config::Config;
use vidsweep::scanner::{HashAlgorithm, OrderPolicy};

#[test]
fn test_config_load_defaults() {
    // Defaults only, so the environment of other tests cannot interfere
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
algorithm = "blake3"
extensions = ["mp4", "webm"]
order = "native"
io_threads = 6
chunk_size = 65536
follow_symlinks = true
skip_hidden = true
"#,
    )
    .unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .extract()
        .unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.extensions, vec!["mp4", "webm"]);
    assert_eq!(config.order, OrderPolicy::Native);
    assert_eq!(config.io_threads, 6);
    assert_eq!(config.chunk_size, 65_536);
    assert!(config.follow_symlinks);
    assert!(config.skip_hidden);
    assert!(!config.dry_run);
}

#[test]
fn test_config_env_overrides_file() {
    // Only settings that do not change which files are removed, since
    // other tests in this binary sweep directories concurrently
    std::env::set_var("VIDSWEEP_IO_THREADS", "5");
    std::env::set_var("VIDSWEEP_CHUNK_SIZE", "2048");

    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "io_threads = 2\nchunk_size = 1024\n").unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("VIDSWEEP_"))
        .extract()
        .unwrap();

    std::env::remove_var("VIDSWEEP_IO_THREADS");
    std::env::remove_var("VIDSWEEP_CHUNK_SIZE");

    assert_eq!(config.io_threads, 5);
    assert_eq!(config.chunk_size, 2048);
}

#[test]
fn test_config_invalid_toml_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "io_threads = [not toml").unwrap();

    assert!(Config::load(Some(path.as_path())).is_err());
}

#[test]
fn test_config_roundtrips_through_toml() {
    let config = Config {
        algorithm: HashAlgorithm::Sha256,
        io_threads: 3,
        ..Default::default()
    };

    let content = toml::to_string_pretty(&config).unwrap();
    assert!(content.contains("algorithm = \"sha256\""));
    assert!(content.contains("io_threads = 3"));

    let parsed: Config = toml::from_str(&content).unwrap();
    assert_eq!(parsed, config);
}
