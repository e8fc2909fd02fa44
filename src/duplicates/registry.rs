//! First-seen registry of content digests.
//!
//! # Overview
//!
//! The [`DigestRegistry`] maps each distinct [`ContentDigest`] to the first
//! path observed with it, the survivor. Entries are written once and never
//! replaced: whichever copy arrives first stays, every later copy is a
//! duplicate of it.
//!
//! # Example
//!
//! ```
//! use vidsweep::duplicates::{DigestRegistry, Observation};
//! use vidsweep::scanner::{ContentDigest, HashAlgorithm};
//! use std::path::Path;
//!
//! let mut registry = DigestRegistry::new();
//! let digest = ContentDigest::new(HashAlgorithm::Md5, "5d41402abc4b2a76b9719d911017c592");
//!
//! assert_eq!(registry.observe(digest.clone(), Path::new("a.mp4")), Observation::Survivor);
//! assert_eq!(
//!     registry.observe(digest, Path::new("b.mp4")),
//!     Observation::Duplicate { survivor: "a.mp4".into() }
//! );
//! assert_eq!(registry.len(), 1);
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::ContentDigest;

/// Outcome of observing a digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First time this digest was seen; the path is now its survivor.
    Survivor,
    /// The digest already has a survivor; the observed path duplicates it.
    Duplicate {
        /// Path registered for this digest.
        survivor: PathBuf,
    },
}

/// Mapping from content digest to the first path observed with it.
///
/// Owned by a single sweep; created empty and discarded when the sweep ends.
#[derive(Debug, Default)]
pub struct DigestRegistry {
    survivors: HashMap<ContentDigest, PathBuf>,
}

impl DigestRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `digest` unless the digest is already known.
    ///
    /// Lookup and insertion are a single step, so a digest can never gain a
    /// second survivor.
    pub fn observe(&mut self, digest: ContentDigest, path: &Path) -> Observation {
        match self.survivors.entry(digest) {
            Entry::Occupied(entry) => Observation::Duplicate {
                survivor: entry.get().clone(),
            },
            Entry::Vacant(entry) => {
                entry.insert(path.to_path_buf());
                Observation::Survivor
            }
        }
    }

    /// Survivor registered for `digest`.
    #[must_use]
    pub fn survivor(&self, digest: &ContentDigest) -> Option<&Path> {
        self.survivors.get(digest).map(PathBuf::as_path)
    }

    /// Whether `digest` has a survivor.
    #[must_use]
    pub fn contains(&self, digest: &ContentDigest) -> bool {
        self.survivors.contains_key(digest)
    }

    /// Number of distinct digests seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    /// Whether nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }

    /// Iterate over `(digest, survivor)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContentDigest, &Path)> {
        self.survivors.iter().map(|(d, p)| (d, p.as_path()))
    }
}
