//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Ordered recursive directory walking using walkdir
//! - Extension-based candidate filtering
//! - Streaming content hashing (MD5, SHA-256, BLAKE3)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`extensions`]: Accepted video extensions
//! - [`hasher`]: Streaming file fingerprinting
//!
//! # Example
//!
//! ```no_run
//! use vidsweep::scanner::{CandidatePath, ExtensionFilter, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let filter = ExtensionFilter::default();
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => {
//!             let candidate = CandidatePath::new(path);
//!             if filter.accepts(&candidate) {
//!                 println!("{}", candidate.path().display());
//!             }
//!         }
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod extensions;
pub mod hasher;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export main types
pub use extensions::{ExtensionFilter, DEFAULT_EXTENSIONS};
pub use hasher::{ContentDigest, HashAlgorithm, Hasher, StreamingHash, DEFAULT_CHUNK_SIZE};
pub use walker::Walker;

/// A file path discovered during traversal.
///
/// Carries the lower-cased file name used by the extension gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    path: PathBuf,
    lower_name: String,
}

impl CandidatePath {
    /// Wrap a path and remember its lower-cased file name.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let lower_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self { path, lower_name }
    }

    /// The full path as yielded by traversal.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lower-cased text after the last dot of the file name, if any.
    ///
    /// Unlike [`Path::extension`], a bare `.mp4` has the extension `mp4`.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.lower_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    /// Whether the lower-cased file name ends with `.{ext}`.
    #[must_use]
    pub fn has_suffix(&self, ext: &str) -> bool {
        self.lower_name
            .strip_suffix(ext)
            .is_some_and(|rest| rest.ends_with('.'))
    }

    /// Base file name, for user-facing messages.
    #[must_use]
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    /// Unwrap into the owned path.
    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl From<PathBuf> for CandidatePath {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

/// Base name of a path, falling back to the whole path.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Order in which directory children are visited.
///
/// The first file encountered for a given content is the one that survives,
/// so this decides which copy is kept.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Children of each directory are visited sorted by file name.
    #[default]
    Name,
    /// Whatever order the filesystem returns.
    Native,
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Warning: symlink cycles are reported as errors by the walker.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Visit order within each directory.
    pub order: OrderPolicy,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(follow_symlinks: bool, skip_hidden: bool, order: OrderPolicy) -> Self {
        Self {
            follow_symlinks,
            skip_hidden,
            order,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A symlink points back at one of its ancestors.
    #[error("Symlink loop at {0}")]
    SymlinkLoop(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::SymlinkLoop(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Interrupted(p)
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Classify an I/O error raised while reading `path`.
pub(crate) fn hash_error_from_io(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
