//! Human readable console output.
//!
//! [`ConsoleReporter`] is the [`DedupObserver`] used by the binary. It prints
//! one line per removed duplicate, a warning per skipped file and a completion
//! line on stdout, and keeps an indicatif spinner running on stderr while
//! files are hashed.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use bytesize::ByteSize;
use yansi::Paint;

use crate::actions::DeleteResult;
use crate::duplicates::{DedupReport, FileError};
use crate::progress::{DedupObserver, Progress};
use crate::scanner::display_name;

/// Prints sweep events for a person watching the terminal.
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
    progress: Progress,
    quiet: bool,
    color: bool,
}

impl ConsoleReporter {
    /// Reporter writing to stdout.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Hide the spinner and per-duplicate lines; warnings still print
    /// * `color` - Color output with ANSI escapes
    #[must_use]
    pub fn new(quiet: bool, color: bool) -> Self {
        Self::with_writer(Box::new(io::stdout()), quiet, color)
    }

    /// Reporter writing to an arbitrary sink.
    #[must_use]
    pub fn with_writer(out: Box<dyn Write + Send>, quiet: bool, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            progress: Progress::new(quiet),
            quiet,
            color,
        }
    }

    /// Spinner driven by this reporter.
    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Line announcing a removed duplicate.
    #[must_use]
    pub fn duplicate_line(&self, removed: &DeleteResult) -> String {
        let name = display_name(&removed.path);
        let name = if self.color {
            name.yellow().to_string()
        } else {
            name
        };
        if removed.dry_run {
            format!("Duplicate found: {name} (dry run, kept)")
        } else {
            format!("Duplicate found: {name}")
        }
    }

    /// Line announcing a skipped file.
    #[must_use]
    pub fn warning_line(&self, error: &FileError) -> String {
        let heading = if self.color {
            "Warning".yellow().bold().to_string()
        } else {
            "Warning".to_string()
        };
        format!("{heading}: skipped {}: {error}", display_name(error.path()))
    }

    /// Line printed when the sweep ends.
    #[must_use]
    pub fn completion_line(&self, report: &DedupReport) -> String {
        let (heading, summary) = if report.interrupted {
            ("Sweep interrupted", report.summary())
        } else if report.dry_run {
            ("Dry run complete", report.summary())
        } else {
            ("Duplicate removal complete", report.summary())
        };

        if !self.color {
            return format!("{heading}: {summary}");
        }
        let heading = if report.interrupted {
            heading.red().bold().to_string()
        } else if report.errors.is_empty() {
            heading.green().bold().to_string()
        } else {
            heading.yellow().bold().to_string()
        };
        format!("{heading}: {summary}")
    }

    fn print(&self, line: &str) {
        self.progress.suspend(|| {
            if let Ok(mut out) = self.out.lock() {
                // A closed stdout must not abort the sweep
                let _ = writeln!(out, "{line}");
                let _ = out.flush();
            }
        });
    }
}

impl DedupObserver for ConsoleReporter {
    fn on_start(&self, root: &Path) {
        self.progress
            .start(format!("Hashing videos under {}", root.display()));
    }

    fn on_hashed(&self, _path: &Path) {
        self.progress.inc();
    }

    fn on_duplicate(&self, removed: &DeleteResult, survivor: &Path) {
        log::debug!(
            "{} ({}) duplicates {}",
            removed.path.display(),
            ByteSize(removed.size),
            survivor.display()
        );
        if !self.quiet {
            self.print(&self.duplicate_line(removed));
        }
    }

    fn on_error(&self, error: &FileError) {
        self.print(&self.warning_line(error));
    }

    fn on_complete(&self, report: &DedupReport) {
        self.progress.finish();
        self.print(&self.completion_line(report));
    }
}
