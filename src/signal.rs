//! Ctrl+C handling.
//!
//! A single `AtomicBool` is shared by the walker, the hasher and the
//! deduplicator. Setting it stops traversal and hashing at the next check and
//! skips the remaining keep/remove decisions. A removal that has already
//! started always runs to completion.
//!
//! ```rust,no_run
//! use vidsweep::duplicates::DedupConfig;
//! use vidsweep::signal::install_handler;
//!
//! let handler = install_handler().expect("failed to install Ctrl+C handler");
//! let config = DedupConfig::default().with_shutdown_flag(handler.get_flag());
//! ```
//!
//! An interrupted sweep exits with
//! [`ExitCode::Interrupted`](crate::error::ExitCode::Interrupted).

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Set the flag.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// The flag itself, for the walker, hasher and deduplicator.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

/// Install the process-wide Ctrl+C handler and return its flag holder.
///
/// The OS handler is registered once per process. Later calls return the
/// same handler with its flag cleared, so `run_app` can be invoked repeatedly
/// from tests.
///
/// # Errors
///
/// Returns [`SignalError`] if the OS refuses the handler for a reason other
/// than one already being registered.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    let result = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "\nInterrupted. Finishing the current removal and stopping..."
        );
        let _ = stderr.flush();
        log::info!("Shutdown signal received");
    });

    match result {
        Ok(()) => {}
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Ctrl+C handler already registered, using an unhooked flag");
        }
        Err(e) => return Err(SignalError::InstallFailed(e)),
    }

    Ok(GLOBAL_HANDLER.get_or_init(|| handler).clone())
}
