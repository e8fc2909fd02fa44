//! Exit codes and structured error output.

use serde::Serialize;

use crate::duplicates::{DedupError, DedupReport};

/// Process exit codes.
///
/// - 0: Sweep completed (per-file warnings included)
/// - 1: General error (configuration, signal setup, anything unexpected)
/// - 2: Invalid input (the directory argument is missing or not a directory)
/// - 130: Interrupted by Ctrl+C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// The sweep ran to completion.
    Success = 0,
    /// An unexpected or configuration error occurred.
    GeneralError = 1,
    /// The directory argument was rejected before any traversal.
    InvalidInput = 2,
    /// The sweep was interrupted by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "VS000",
            Self::GeneralError => "VS001",
            Self::InvalidInput => "VS002",
            Self::Interrupted => "VS130",
        }
    }

    /// Exit code for a finished sweep.
    #[must_use]
    pub fn from_report(report: &DedupReport) -> Self {
        if report.interrupted {
            Self::Interrupted
        } else {
            Self::Success
        }
    }

    /// Exit code for a fatal error returned by `run_app`.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<DedupError>().is_some() {
            Self::InvalidInput
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "VS002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }

    /// Render as pretty JSON, falling back to a plain line.
    #[must_use]
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| format!("[{}] Error: {}", self.code, self.message))
    }
}
