//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, the traversal collaborator of
//! the sweep pipeline. It recursively yields the paths of regular files under
//! a root directory, one at a time, in a well-defined order.
//!
//! # Features
//!
//! - Recursive traversal, subdirectories included
//! - Name-sorted or native visit order ([`OrderPolicy`])
//! - Symlinks skipped unless following is enabled
//! - Hidden file filtering
//! - Errors yielded inline rather than stopping the walk
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use vidsweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Videos"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{OrderPolicy, ScanError, WalkerConfig};

/// Recursive directory walker.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Stop yielding entries once the flag is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory tree, yielding regular file paths.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Directories, symlinks (unless followed) and special files
    /// are not yielded.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vidsweep::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let mut walk_dir = WalkDir::new(&self.root).follow_links(self.config.follow_symlinks);

        if self.config.order == OrderPolicy::Name {
            walk_dir = walk_dir.sort_by(|a, b| a.file_name().cmp(b.file_name()));
        }

        let skip_hidden = self.config.skip_hidden;

        walk_dir
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && entry.depth() > 0 && is_hidden(entry)))
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    if file_type.is_symlink() {
                        // Only reachable when links are not followed
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    if !file_type.is_file() {
                        log::trace!("Skipping special file: {}", entry.path().display());
                        return None;
                    }

                    Some(Ok(entry.into_path()))
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            log::debug!("Symlink loop detected at {}", path.display());
            return ScanError::SymlinkLoop(path);
        }

        let permission_denied = error
            .io_error()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied);

        if permission_denied {
            log::debug!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path)
        } else {
            log::debug!("Walker error for {}: {}", path.display(), error);
            ScanError::Io {
                path,
                source: std::io::Error::from(error),
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
