use std::fs;

use clap::Parser;
use tempfile::tempdir;
use vidsweep::cli::Cli;
use vidsweep::error::ExitCode;

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["vidsweep", "--quiet", "--no-color"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_run_app_removes_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp4"), b"dup").unwrap();
    fs::write(dir.path().join("b.mp4"), b"dup").unwrap();

    let code = vidsweep::run_app(cli(&[dir.path().to_str().unwrap()])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("a.mp4").exists());
    assert!(!dir.path().join("b.mp4").exists());
}

#[test]
fn test_run_app_dry_run_keeps_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mkv"), b"dup").unwrap();
    fs::write(dir.path().join("b.mkv"), b"dup").unwrap();

    let code = vidsweep::run_app(cli(&["--dry-run", dir.path().to_str().unwrap()])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("b.mkv").exists());
}

#[test]
fn test_run_app_ext_flag() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.webm"), b"dup").unwrap();
    fs::write(dir.path().join("b.webm"), b"dup").unwrap();
    fs::write(dir.path().join("c.mp4"), b"dup").unwrap();
    fs::write(dir.path().join("d.mp4"), b"dup").unwrap();

    let code =
        vidsweep::run_app(cli(&["--ext", "webm", dir.path().to_str().unwrap()])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(!dir.path().join("b.webm").exists());
    assert!(dir.path().join("c.mp4").exists());
    assert!(dir.path().join("d.mp4").exists());
}

#[test]
fn test_run_app_with_algorithm_and_threads() {
    let dir = tempdir().unwrap();
    for name in ["a.avi", "b.avi", "c.avi"] {
        fs::write(dir.path().join(name), b"same").unwrap();
    }

    let code = vidsweep::run_app(cli(&[
        "--algorithm",
        "blake3",
        "--io-threads",
        "3",
        "--chunk-size",
        "1KiB",
        dir.path().to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("a.avi").exists());
    assert!(!dir.path().join("b.avi").exists());
    assert!(!dir.path().join("c.avi").exists());
}

#[test]
fn test_run_app_with_config_file() {
    let dir = tempdir().unwrap();
    let videos = dir.path().join("videos");
    fs::create_dir(&videos).unwrap();
    fs::write(videos.join("a.mp4"), b"dup").unwrap();
    fs::write(videos.join("b.mp4"), b"dup").unwrap();
    let config = dir.path().join("vidsweep.toml");
    fs::write(&config, "dry_run = true\nalgorithm = \"sha256\"\n").unwrap();

    let code = vidsweep::run_app(cli(&[
        "--config",
        config.to_str().unwrap(),
        videos.to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(videos.join("b.mp4").exists());
}

#[test]
fn test_run_app_missing_config_file_is_error() {
    let dir = tempdir().unwrap();

    let err = vidsweep::run_app(cli(&[
        "--config",
        "/nonexistent/vidsweep.toml",
        dir.path().to_str().unwrap(),
    ]))
    .unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
}
