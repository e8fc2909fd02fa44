//! Accepted video extensions.

use std::collections::BTreeSet;

use super::CandidatePath;

/// Extensions accepted when nothing else is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "flv"];

/// Case-insensitive extension gate.
///
/// Files whose extension is not in the set are never hashed and never
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    accepted: BTreeSet<String>,
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl ExtensionFilter {
    /// Build a filter from extensions with or without a leading dot.
    ///
    /// Blank entries are ignored.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted = extensions
            .into_iter()
            .map(|ext| normalize(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { accepted }
    }

    /// Whether a candidate passes the gate.
    ///
    /// Matches the lower-cased file name against `.{ext}`, so a file named
    /// just `.mp4` is a video too.
    #[must_use]
    pub fn accepts(&self, candidate: &CandidatePath) -> bool {
        self.accepted.iter().any(|ext| candidate.has_suffix(ext))
    }

    /// Accepted extensions in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }

    /// Number of accepted extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Whether the filter accepts nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

fn normalize(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
