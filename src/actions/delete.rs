//! Duplicate removal.
//!
//! # Overview
//!
//! This module performs the only mutating operation of a sweep: removing a
//! file that was confirmed to duplicate an earlier survivor.
//!
//! - Permanent deletion via `std::fs::remove_file` (there is no trash)
//! - Dry-run mode that reports without touching the disk
//! - TOCTOU verification against the snapshot taken when the file was hashed
//! - Refusal to remove a path that resolves to its own survivor
//!
//! # Example
//!
//! ```no_run
//! use vidsweep::actions::delete::{remove_duplicate, DeleteConfig, FileSnapshot};
//! use std::path::Path;
//!
//! let duplicate = Path::new("/videos/copy.mp4");
//! let survivor = Path::new("/videos/original.mp4");
//! let snapshot = FileSnapshot::capture(duplicate).unwrap();
//!
//! match remove_duplicate(&snapshot, survivor, &DeleteConfig::default()) {
//!     Ok(result) => println!("Removed {} ({} bytes)", result.path.display(), result.size),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File was modified between hashing and deletion.
    #[error("file modified since it was hashed: {0}")]
    Modified(PathBuf),

    /// The duplicate and its survivor are the same file on disk.
    #[error("refusing to delete {path}: it resolves to the kept copy {survivor}")]
    SameAsSurvivor { path: PathBuf, survivor: PathBuf },

    /// The removal syscall failed.
    #[error("delete failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Path of the file that could not be removed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Modified(p)
            | Self::SameAsSurvivor { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Result of a successful removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was removed (or would have been, in dry-run mode).
    pub path: PathBuf,
    /// Size of the removed file in bytes.
    pub size: u64,
    /// Whether the file was left in place because of dry-run mode.
    pub dry_run: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, dry_run: bool) -> Self {
        Self {
            path,
            size,
            dry_run,
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    /// Report removals without performing them.
    pub dry_run: bool,
    /// Verify size and modification time before deletion (TOCTOU protection).
    pub verify_unchanged: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            verify_unchanged: true,
        }
    }
}

impl DeleteConfig {
    /// Config that never touches the disk.
    #[must_use]
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Enable/disable dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable/disable TOCTOU verification.
    #[must_use]
    pub fn with_verify_unchanged(mut self, verify: bool) -> Self {
        self.verify_unchanged = verify;
        self
    }
}

/// File metadata snapshot for TOCTOU verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    /// Path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub mtime: Option<SystemTime>,
}

impl FileSnapshot {
    /// Build a snapshot from metadata already fetched by the caller.
    #[must_use]
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime: metadata.modified().ok(),
        }
    }

    /// Create a snapshot of a file's current state.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or can't be accessed.
    pub fn capture(path: &Path) -> Result<Self, DeleteError> {
        let metadata = fs::metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
        Ok(Self::from_metadata(path, &metadata))
    }

    /// Verify that the file still matches this snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if file was modified, deleted, or can't be accessed.
    pub fn verify(&self) -> Result<(), DeleteError> {
        let current = Self::capture(&self.path)?;

        if let (Some(orig), Some(curr)) = (self.mtime, current.mtime) {
            if orig != curr {
                log::debug!(
                    "File modified since hashing: {} (mtime changed)",
                    self.path.display()
                );
                return Err(DeleteError::Modified(self.path.clone()));
            }
        }

        if self.size != current.size {
            log::debug!(
                "File modified since hashing: {} (size changed from {} to {})",
                self.path.display(),
                self.size,
                current.size
            );
            return Err(DeleteError::Modified(self.path.clone()));
        }

        Ok(())
    }
}

/// Remove a confirmed duplicate.
///
/// `snapshot` describes the duplicate as it was when hashed; `survivor` is
/// the copy that stays. Exactly one `remove_file` call is made on success,
/// none in dry-run mode.
///
/// # Errors
///
/// - `SameAsSurvivor` if both paths resolve to the same file
/// - `Modified` if the duplicate changed since it was hashed
/// - `NotFound`, `PermissionDenied`, `Io` if the removal fails
pub fn remove_duplicate(
    snapshot: &FileSnapshot,
    survivor: &Path,
    config: &DeleteConfig,
) -> Result<DeleteResult, DeleteError> {
    let path = snapshot.path.as_path();

    if resolves_to_same_file(path, survivor) {
        log::debug!(
            "{} resolves to the kept copy {}, not deleting",
            path.display(),
            survivor.display()
        );
        return Err(DeleteError::SameAsSurvivor {
            path: path.to_path_buf(),
            survivor: survivor.to_path_buf(),
        });
    }

    if config.verify_unchanged {
        snapshot.verify()?;
    }

    if config.dry_run {
        log::info!(
            "Dry run, would delete: {} ({} bytes)",
            path.display(),
            snapshot.size
        );
        return Ok(DeleteResult::new(path.to_path_buf(), snapshot.size, true));
    }

    fs::remove_file(path).map_err(|e| {
        log::debug!("Delete failed for {}: {}", path.display(), e);
        DeleteError::from_io(path, e)
    })?;

    log::info!("Deleted: {} ({} bytes)", path.display(), snapshot.size);

    Ok(DeleteResult::new(path.to_path_buf(), snapshot.size, false))
}

/// Whether two paths name the same file after resolving links and `..`.
///
/// Paths that cannot be canonicalized are compared as given.
fn resolves_to_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
