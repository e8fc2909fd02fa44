//! Output for sweep results.
//!
//! # Example
//!
//! ```no_run
//! use vidsweep::duplicates::{DedupConfig, Deduplicator};
//! use vidsweep::output::ConsoleReporter;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let reporter = Arc::new(ConsoleReporter::new(false, true));
//! let dedup = Deduplicator::new(DedupConfig::default().with_observer(reporter));
//! dedup.sweep(Path::new("/home/user/Videos")).unwrap();
//! ```

pub mod console;

pub use console::ConsoleReporter;
