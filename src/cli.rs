//! Command-line interface definitions for vidsweep.
//!
//! The CLI takes a single directory and a handful of options controlling how
//! duplicates are detected and whether they are actually removed. Every option
//! left unset falls back to the configuration file (see [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Remove duplicate videos under ~/Videos, keeping the first copy
//! vidsweep ~/Videos
//!
//! # Show what would be removed without touching anything
//! vidsweep --dry-run ~/Videos
//!
//! # Hash with BLAKE3 on four threads
//! vidsweep --algorithm blake3 --io-threads 4 ~/Videos
//!
//! # Only consider .webm and .mp4 files
//! vidsweep --ext webm --ext mp4 ~/Videos
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::scanner::{HashAlgorithm, OrderPolicy};

/// Remove duplicate video files from a directory tree.
///
/// Every video under DIRECTORY is hashed; the first file seen with a given
/// content is kept and every later copy is deleted.
#[derive(Debug, Parser)]
#[command(name = "vidsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to sweep for duplicate videos
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Content digest used to compare files
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub algorithm: Option<HashAlgorithm>,

    /// Report duplicates without deleting them
    #[arg(long)]
    pub dry_run: bool,

    /// Order in which directory entries are visited
    ///
    /// `name` sorts siblings by file name so the kept copy is reproducible.
    #[arg(long, value_enum, value_name = "ORDER")]
    pub order: Option<OrderPolicy>,

    /// Number of threads used for hashing (1 = sequential)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: Option<u16>,

    /// Read buffer size used while hashing (e.g., 4KiB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub chunk_size: Option<u64>,

    /// Video extension to accept (can be specified multiple times)
    ///
    /// Replaces the default set: mp4, mkv, avi, mov, flv.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Follow symbolic links during traversal
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Path to a TOML configuration file
    ///
    /// If not specified, a default platform-specific path is used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Whether colored output should be used.
    #[must_use]
    pub fn color_enabled(&self) -> bool {
        !self.no_color
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports decimal (KB, MB, GB) and binary (KiB, MiB, GiB) suffixes,
/// case-insensitively. A bare number is bytes.
///
/// # Examples
///
/// ```
/// use vidsweep::cli::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("4KiB").unwrap(), 4096);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns an error for empty input, a malformed number or an unknown suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
