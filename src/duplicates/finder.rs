//! Sweep pipeline: traverse, filter, fingerprint, decide, remove.
//!
//! # Overview
//!
//! The [`Deduplicator`] consumes a stream of file paths and, for each one:
//! 1. **Filter**: skip files whose extension is not a video extension
//! 2. **Fingerprint**: stream the content through the configured digest
//! 3. **Decide**: consult the [`DigestRegistry`]; the first path with a digest
//!    is kept, every later one is removed
//!
//! Failures on one file are recorded in the [`DedupReport`] and the sweep
//! moves on. With `io_threads > 1` fingerprinting runs on a rayon pool, but
//! decisions and removals still happen one at a time in traversal order, so
//! the set of survivors is identical to a sequential run.
//!
//! # Example
//!
//! ```no_run
//! use vidsweep::duplicates::{DedupConfig, Deduplicator};
//! use std::path::Path;
//!
//! let dedup = Deduplicator::new(DedupConfig::default().with_dry_run(true));
//! let report = dedup.sweep(Path::new("/home/user/Videos")).unwrap();
//!
//! for removed in &report.removed {
//!     println!("would remove {}", removed.path.display());
//! }
//! println!("{}", report.summary());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;
use thiserror::Error;

use super::registry::{DigestRegistry, Observation};
use crate::actions::delete::{
    remove_duplicate, DeleteConfig, DeleteError, DeleteResult, FileSnapshot,
};
use crate::progress::DedupObserver;
use crate::scanner::{
    hash_error_from_io, CandidatePath, ContentDigest, ExtensionFilter, HashAlgorithm, HashError,
    Hasher, ScanError, Walker, WalkerConfig, DEFAULT_CHUNK_SIZE,
};

/// Configuration for a sweep.
#[derive(Clone)]
pub struct DedupConfig {
    /// Extensions that qualify a file as a candidate.
    pub extensions: ExtensionFilter,
    /// Content digest used to compare files.
    pub algorithm: HashAlgorithm,
    /// Read buffer size used while hashing.
    pub chunk_size: usize,
    /// Number of threads used for fingerprinting. 1 means sequential.
    pub io_threads: usize,
    /// Report removals without performing them.
    pub dry_run: bool,
    /// Re-check size and mtime of a duplicate right before removing it.
    pub verify_unchanged: bool,
    /// Traversal options.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional observer receiving progress events.
    pub observer: Option<Arc<dyn DedupObserver>>,
}

impl std::fmt::Debug for DedupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupConfig")
            .field("extensions", &self.extensions)
            .field("algorithm", &self.algorithm)
            .field("chunk_size", &self.chunk_size)
            .field("io_threads", &self.io_threads)
            .field("dry_run", &self.dry_run)
            .field("verify_unchanged", &self.verify_unchanged)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field("observer", &self.observer.as_ref().map(|_| "<observer>"))
            .finish()
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            extensions: ExtensionFilter::default(),
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            io_threads: 1,
            dry_run: false,
            verify_unchanged: true,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            observer: None,
        }
    }
}

impl DedupConfig {
    /// Set the accepted extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionFilter) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the hashing chunk size (minimum 1).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the number of fingerprinting threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable the pre-removal size/mtime check.
    #[must_use]
    pub fn with_verify_unchanged(mut self, verify: bool) -> Self {
        self.verify_unchanged = verify;
        self
    }

    /// Set the traversal options.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn DedupObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// Error preventing a sweep from starting.
#[derive(Debug, Error)]
pub enum DedupError {
    /// The root directory does not exist.
    #[error("Directory not found: {0}")]
    PathNotFound(PathBuf),

    /// The root exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl DedupError {
    /// Path that was rejected.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound(p) | Self::NotADirectory(p) => p,
        }
    }
}

/// A per-file failure. The file is skipped and the sweep continues.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file or a directory could not be listed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The file could not be read.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// The duplicate could not be removed.
    #[error(transparent)]
    Delete(#[from] DeleteError),
}

impl FileError {
    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Scan(e) => e.path(),
            Self::Hash(e) => e.path(),
            Self::Delete(e) => e.path(),
        }
    }
}

/// Outcome of a sweep.
#[derive(Debug, Default)]
pub struct DedupReport {
    /// Regular files yielded by traversal.
    pub files_seen: usize,
    /// Files skipped because of their extension.
    pub skipped_by_extension: usize,
    /// Files accepted by the extension filter.
    pub candidates: usize,
    /// Candidates successfully fingerprinted.
    pub hashed: usize,
    /// Kept files, in the order they were first seen.
    pub survivors: Vec<PathBuf>,
    /// Removed duplicates, in removal order.
    pub removed: Vec<DeleteResult>,
    /// Files skipped because of an error.
    pub errors: Vec<FileError>,
    /// Total size of removed duplicates.
    pub bytes_reclaimed: u64,
    /// Distinct digests recorded in the registry.
    pub unique_digests: usize,
    /// Whether removals were only simulated.
    pub dry_run: bool,
    /// Whether the sweep stopped early on a shutdown request.
    pub interrupted: bool,
    /// Wall-clock time of the sweep.
    pub duration: Duration,
}

impl DedupReport {
    /// Whether every candidate was processed without error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.interrupted
    }

    /// One-line human readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = if self.dry_run {
            format!(
                "would remove {} duplicate(s), keeping {} unique video(s), {} reclaimable",
                self.removed.len(),
                self.survivors.len(),
                ByteSize(self.bytes_reclaimed)
            )
        } else {
            format!(
                "removed {} duplicate(s), kept {} unique video(s), {} reclaimed",
                self.removed.len(),
                self.survivors.len(),
                ByteSize(self.bytes_reclaimed)
            )
        };
        if !self.errors.is_empty() {
            summary.push_str(&format!(", {} file(s) skipped due to errors", self.errors.len()));
        }
        summary
    }
}

/// Content snapshot of a candidate taken when it was hashed.
#[derive(Debug)]
struct Fingerprint {
    snapshot: FileSnapshot,
    digest: ContentDigest,
}

/// Mutable state of one sweep, owned by the coordinating thread.
#[derive(Default)]
struct SweepState {
    registry: DigestRegistry,
    report: DedupReport,
}

/// Removes duplicate videos, keeping the first copy of each content.
#[derive(Debug)]
pub struct Deduplicator {
    config: DedupConfig,
    hasher: Hasher,
    delete_config: DeleteConfig,
}

impl Deduplicator {
    /// Create a deduplicator with the given configuration.
    #[must_use]
    pub fn new(config: DedupConfig) -> Self {
        let mut hasher = Hasher::new()
            .with_algorithm(config.algorithm)
            .with_chunk_size(config.chunk_size);
        if let Some(flag) = &config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(Arc::clone(flag));
        }
        let delete_config = DeleteConfig::default()
            .with_dry_run(config.dry_run)
            .with_verify_unchanged(config.verify_unchanged);

        Self {
            config,
            hasher,
            delete_config,
        }
    }

    /// Create a deduplicator with default settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DedupConfig::default())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    fn is_shutdown_requested(&self) -> bool {
        self.config
            .shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Sweep every video under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError`] if `root` is missing or not a directory. Nothing
    /// is touched in that case. Per-file failures are reported in the
    /// returned [`DedupReport`] instead.
    pub fn sweep(&self, root: &Path) -> Result<DedupReport, DedupError> {
        if !root.exists() {
            return Err(DedupError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(DedupError::NotADirectory(root.to_path_buf()));
        }

        log::info!(
            "Sweeping {} ({}, {} thread(s){})",
            root.display(),
            self.config.algorithm,
            self.config.io_threads,
            if self.config.dry_run { ", dry run" } else { "" }
        );
        if let Some(observer) = &self.config.observer {
            observer.on_start(root);
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(flag) = &self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        Ok(self.run(walker.walk()))
    }

    /// Process a stream of traversal results in order.
    ///
    /// Traversal errors in the stream are recorded and skipped.
    pub fn run<I>(&self, entries: I) -> DedupReport
    where
        I: IntoIterator<Item = Result<PathBuf, ScanError>>,
    {
        let start = Instant::now();
        let mut state = SweepState::default();
        state.report.dry_run = self.config.dry_run;

        if self.config.io_threads > 1 {
            self.run_parallel(entries, &mut state);
        } else {
            self.run_sequential(entries, &mut state);
        }

        let SweepState {
            registry,
            mut report,
        } = state;
        report.unique_digests = registry.len();
        report.interrupted = report.interrupted || self.is_shutdown_requested();
        report.duration = start.elapsed();

        log::info!(
            "Sweep {}: {} file(s) seen, {} candidate(s), {} in {:.2?}",
            if report.interrupted { "interrupted" } else { "complete" },
            report.files_seen,
            report.candidates,
            report.summary(),
            report.duration
        );
        if let Some(observer) = &self.config.observer {
            observer.on_complete(&report);
        }

        report
    }

    /// Process an explicit list of paths in the given order.
    pub fn run_paths<I>(&self, paths: I) -> DedupReport
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.run(paths.into_iter().map(Ok))
    }

    fn run_sequential<I>(&self, entries: I, state: &mut SweepState)
    where
        I: IntoIterator<Item = Result<PathBuf, ScanError>>,
    {
        for entry in entries {
            if self.is_shutdown_requested() {
                state.report.interrupted = true;
                break;
            }
            let Some(candidate) = self.admit(entry, state) else {
                continue;
            };
            let fingerprint = self.fingerprint(&candidate);
            if !self.decide(candidate, fingerprint, state) {
                break;
            }
        }
    }

    fn run_parallel<I>(&self, entries: I, state: &mut SweepState)
    where
        I: IntoIterator<Item = Result<PathBuf, ScanError>>,
    {
        let candidates: Vec<CandidatePath> = entries
            .into_iter()
            .take_while(|_| !self.is_shutdown_requested())
            .filter_map(|entry| self.admit(entry, state))
            .collect();

        log::debug!(
            "Fingerprinting {} candidate(s) on {} thread(s)",
            candidates.len(),
            self.config.io_threads
        );

        let fingerprints: Vec<Result<Fingerprint, HashError>> = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
        {
            Ok(pool) => pool.install(|| {
                candidates
                    .par_iter()
                    .map(|candidate| self.fingerprint(candidate))
                    .collect()
            }),
            Err(e) => {
                log::warn!("Failed to create hashing thread pool ({e}), hashing sequentially");
                candidates
                    .iter()
                    .map(|candidate| self.fingerprint(candidate))
                    .collect()
            }
        };

        for (candidate, fingerprint) in candidates.into_iter().zip(fingerprints) {
            if self.is_shutdown_requested() {
                state.report.interrupted = true;
                break;
            }
            if !self.decide(candidate, fingerprint, state) {
                break;
            }
        }
    }

    /// Apply the extension filter to one traversal result.
    fn admit(
        &self,
        entry: Result<PathBuf, ScanError>,
        state: &mut SweepState,
    ) -> Option<CandidatePath> {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                self.record_error(state, e.into());
                return None;
            }
        };

        state.report.files_seen += 1;
        let candidate = CandidatePath::new(path);
        if self.config.extensions.accepts(&candidate) {
            state.report.candidates += 1;
            Some(candidate)
        } else {
            log::trace!("Skipping non-video file: {}", candidate.path().display());
            state.report.skipped_by_extension += 1;
            None
        }
    }

    /// Snapshot and hash a candidate. Safe to call from worker threads.
    fn fingerprint(&self, candidate: &CandidatePath) -> Result<Fingerprint, HashError> {
        let path = candidate.path();
        let metadata = fs::metadata(path).map_err(|e| hash_error_from_io(path, e))?;
        let snapshot = FileSnapshot::from_metadata(path, &metadata);
        let digest = self.hasher.digest(path)?;

        if let Some(observer) = &self.config.observer {
            observer.on_hashed(path);
        }

        Ok(Fingerprint { snapshot, digest })
    }

    /// Keep or remove a fingerprinted candidate.
    ///
    /// Returns false when the sweep must stop.
    fn decide(
        &self,
        candidate: CandidatePath,
        fingerprint: Result<Fingerprint, HashError>,
        state: &mut SweepState,
    ) -> bool {
        let Fingerprint { snapshot, digest } = match fingerprint {
            Ok(fingerprint) => fingerprint,
            Err(HashError::Interrupted(path)) => {
                log::debug!("Hashing of {} interrupted", path.display());
                state.report.interrupted = true;
                return false;
            }
            Err(e) => {
                self.record_error(state, e.into());
                return true;
            }
        };

        state.report.hashed += 1;
        log::trace!("{} {}", digest.short(), candidate.path().display());

        match state.registry.observe(digest, candidate.path()) {
            Observation::Survivor => {
                state.report.survivors.push(candidate.into_path());
            }
            Observation::Duplicate { survivor } => {
                log::debug!(
                    "{} duplicates {}",
                    candidate.path().display(),
                    survivor.display()
                );
                match remove_duplicate(&snapshot, &survivor, &self.delete_config) {
                    Ok(removed) => {
                        state.report.bytes_reclaimed += removed.size;
                        if let Some(observer) = &self.config.observer {
                            observer.on_duplicate(&removed, &survivor);
                        }
                        state.report.removed.push(removed);
                    }
                    Err(e) => self.record_error(state, e.into()),
                }
            }
        }

        true
    }

    fn record_error(&self, state: &mut SweepState, error: FileError) {
        // An observer owns the user-facing warning
        if let Some(observer) = &self.config.observer {
            log::debug!("Skipping {}: {}", error.path().display(), error);
            observer.on_error(&error);
        } else {
            log::warn!("Skipping {}: {}", error.path().display(), error);
        }
        state.report.errors.push(error);
    }
}
