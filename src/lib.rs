//! vidsweep - duplicate video remover
//!
//! Walks a directory tree, fingerprints every video file by content and
//! deletes every copy after the first one seen. Non-video files are never
//! read or touched.
//!
//! # Architecture
//!
//! - [`scanner`]: traversal, extension filter, streaming digests
//! - [`duplicates`]: digest registry and the sweep pipeline
//! - [`actions`]: removal with dry-run and change detection
//! - [`output`] and [`progress`]: console reporting
//! - [`cli`], [`config`], [`logging`], [`signal`], [`error`]: the binary's plumbing

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Config;
use crate::duplicates::Deduplicator;
use crate::error::ExitCode;
use crate::output::ConsoleReporter;

/// Run a sweep as described by the command line.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the Ctrl+C handler
/// cannot be installed, or the directory argument is rejected. Errors on
/// individual files never end up here.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);
    config.validate().context("Invalid command-line options")?;
    log::debug!("Effective configuration: {:?}", config);

    let handler = signal::install_handler()?;
    let reporter = Arc::new(ConsoleReporter::new(cli.quiet, cli.color_enabled()));

    let dedup = Deduplicator::new(
        config
            .dedup_config()
            .with_shutdown_flag(handler.get_flag())
            .with_observer(reporter),
    );

    let report = dedup
        .sweep(&cli.directory)
        .with_context(|| format!("Cannot sweep {}", cli.directory.display()))?;

    Ok(ExitCode::from_report(&report))
}
