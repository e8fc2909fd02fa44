//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Recording the first path seen for each content digest ([`registry`])
//! - Driving a sweep from traversal to removal ([`finder`])

pub mod finder;
pub mod registry;

pub use finder::{DedupConfig, DedupError, DedupReport, Deduplicator, FileError};
pub use registry::{DigestRegistry, Observation};
