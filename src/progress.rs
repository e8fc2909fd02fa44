//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`DedupObserver`] trait through which a sweep
//! reports what it is doing, and the [`Progress`] spinner used by the console
//! front end while files are being hashed.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::actions::DeleteResult;
use crate::duplicates::{DedupReport, FileError};

/// Receives events from a running sweep.
///
/// Methods may be called from hashing worker threads, hence `Send + Sync`.
/// Duplicate, error and completion events are always delivered from the
/// coordinating thread, in candidate order.
pub trait DedupObserver: Send + Sync {
    /// Called once before traversal starts.
    fn on_start(&self, _root: &Path) {}

    /// Called after a candidate was fingerprinted.
    fn on_hashed(&self, _path: &Path) {}

    /// Called for every duplicate that was removed (or would be, in dry-run mode).
    ///
    /// # Arguments
    ///
    /// * `removed` - The removed duplicate
    /// * `survivor` - The earlier copy that was kept
    fn on_duplicate(&self, removed: &DeleteResult, survivor: &Path);

    /// Called when a file is skipped because of an error.
    fn on_error(&self, _error: &FileError) {}

    /// Called once when the sweep finishes, interrupted or not.
    fn on_complete(&self, report: &DedupReport);
}

/// Spinner showing how many candidates have been hashed.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a new progress spinner.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use vidsweep::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// progress.inc();
    /// assert_eq!(progress.position(), 1);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(Self::spinner_style());
            bar
        };
        Self { bar }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} hashed")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    /// Start ticking with a message.
    pub fn start(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
        self.bar.enable_steady_tick(Duration::from_millis(120));
    }

    /// Count one hashed file.
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Number of files counted so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Run `f` with the spinner hidden, so printed lines don't interleave.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Stop and erase the spinner.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_progress_counts() {
        let progress = Progress::new(true);
        progress.inc();
        progress.inc();
        assert_eq!(progress.position(), 2);
    }

    #[test]
    fn test_suspend_returns_value() {
        let progress = Progress::new(true);
        assert_eq!(progress.suspend(|| 42), 42);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let progress = Progress::new(false);
        progress.start("Hashing");
        progress.finish();
        progress.finish();
    }
}
