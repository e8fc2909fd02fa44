//! File actions module.
//!
//! Removal of confirmed duplicates, with a dry-run mode and TOCTOU
//! verification. There is no trash or undo: a removed file is gone.
//!
//! ```no_run
//! use vidsweep::actions::{remove_duplicate, DeleteConfig, FileSnapshot};
//! use std::path::Path;
//!
//! let snapshot = FileSnapshot::capture(Path::new("/videos/copy.mp4")).unwrap();
//! let result = remove_duplicate(&snapshot, Path::new("/videos/a.mp4"), &DeleteConfig::dry_run());
//! ```

pub mod delete;

pub use delete::{remove_duplicate, DeleteConfig, DeleteError, DeleteResult, FileSnapshot};
