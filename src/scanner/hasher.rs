//! Streaming file fingerprinting.
//!
//! # Overview
//!
//! The [`Hasher`] computes a [`ContentDigest`] for a single file by reading it
//! in fixed-size chunks and feeding each chunk into an incremental hash
//! accumulator. Memory use is bounded by the chunk size regardless of how
//! large the file is.
//!
//! The algorithm is selected with [`HashAlgorithm`]. MD5 (128-bit) is the
//! default; SHA-256 and BLAKE3 are available when collision resistance
//! matters.
//!
//! # Example
//!
//! ```no_run
//! use vidsweep::scanner::{HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new().with_algorithm(HashAlgorithm::Sha256);
//! let digest = hasher.digest(Path::new("movie.mp4")).unwrap();
//! println!("{} {}", digest.algorithm(), digest);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{hash_error_from_io, HashError};

/// Default read size for streaming hashes.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Hash algorithms available for fingerprinting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, 128-bit. Fast, not collision-resistant against crafted input.
    #[default]
    Md5,
    /// SHA-256, 256-bit.
    Sha256,
    /// BLAKE3, 256-bit.
    Blake3,
}

impl HashAlgorithm {
    /// Digest width in bits.
    #[must_use]
    pub fn bits(self) -> usize {
        match self {
            Self::Md5 => 128,
            Self::Sha256 | Self::Blake3 => 256,
        }
    }

    /// Lower-case algorithm name as used in config files and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }

    /// Create a fresh accumulator for this algorithm.
    #[must_use]
    pub fn accumulator(self) -> Box<dyn StreamingHash> {
        match self {
            Self::Md5 => Box::new(<md5::Md5 as md5::Digest>::new()),
            Self::Sha256 => Box::new(<sha2::Sha256 as sha2::Digest>::new()),
            Self::Blake3 => Box::new(blake3::Hasher::new()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Incremental hash accumulator.
///
/// Implementations receive the file as a sequence of chunks and produce a
/// lower-case hex string once the stream is exhausted.
pub trait StreamingHash: Send {
    /// Feed the next chunk of input.
    fn update(&mut self, chunk: &[u8]);

    /// Consume the accumulator and return the hex digest.
    fn finish_hex(self: Box<Self>) -> String;
}

impl StreamingHash for md5::Md5 {
    fn update(&mut self, chunk: &[u8]) {
        md5::Digest::update(self, chunk);
    }

    fn finish_hex(self: Box<Self>) -> String {
        format!("{:x}", md5::Digest::finalize(*self))
    }
}

impl StreamingHash for sha2::Sha256 {
    fn update(&mut self, chunk: &[u8]) {
        sha2::Digest::update(self, chunk);
    }

    fn finish_hex(self: Box<Self>) -> String {
        format!("{:x}", sha2::Digest::finalize(*self))
    }
}

impl StreamingHash for blake3::Hasher {
    fn update(&mut self, chunk: &[u8]) {
        blake3::Hasher::update(self, chunk);
    }

    fn finish_hex(self: Box<Self>) -> String {
        self.finalize().to_hex().to_string()
    }
}

/// Hex-encoded content digest tagged with the algorithm that produced it.
///
/// Two digests are equal only if both the algorithm and the hex value match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    algorithm: HashAlgorithm,
    hex: String,
}

impl ContentDigest {
    /// Wrap an already computed hex digest.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, hex: impl Into<String>) -> Self {
        Self {
            algorithm,
            hex: hex.into().to_ascii_lowercase(),
        }
    }

    /// The algorithm that produced this digest.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The hex-encoded digest value.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// First 12 hex characters, for log lines.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.hex[..self.hex.len().min(12)]
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Streaming file hasher.
///
/// Cheap to clone and safe to share between worker threads.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// MD5 hasher reading 4 KiB chunks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
        }
    }

    /// Select the hash algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read size. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Abort in-progress reads when the flag is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The configured read size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Compute the digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`HashError::NotFound`] if the file does not exist
    /// - [`HashError::PermissionDenied`] if it cannot be opened for reading
    /// - [`HashError::Io`] if a read fails partway
    /// - [`HashError::Interrupted`] if shutdown was requested mid-stream
    pub fn digest(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let file = File::open(path).map_err(|e| hash_error_from_io(path, e))?;
        self.digest_reader(file, path)
    }

    /// Compute the digest of an arbitrary reader.
    ///
    /// `path` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::digest`], minus the open failures.
    pub fn digest_reader<R: Read>(
        &self,
        mut reader: R,
        path: &Path,
    ) -> Result<ContentDigest, HashError> {
        let mut accumulator = self.algorithm.accumulator();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }

            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => accumulator.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(hash_error_from_io(path, e)),
            }
        }

        let digest = ContentDigest::new(self.algorithm, accumulator.finish_hex());
        log::trace!("{} {} {}", self.algorithm, digest.short(), path.display());
        Ok(digest)
    }
}
