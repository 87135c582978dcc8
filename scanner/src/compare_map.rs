//! The in-memory `digest -> path` table used for duplicate lookups.
//!
//! Rebuilt fresh for each top-level operation rather than shared as a single
//! long-lived global: the prior design's "one mutable map for the whole
//! process" made every caller implicitly depend on call order. Here a
//! caller builds a [`ComparisonMap`], populates it for the scope of one
//! operation, and discards it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fingerprint::Digest;

/// A `digest -> path` table. The most recent insertion for a digest wins.
#[derive(Clone, Debug, Default)]
pub struct ComparisonMap {
    entries: HashMap<Digest, PathBuf>,
}

impl ComparisonMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as the current holder of `digest`, replacing whatever
    /// path was previously recorded for it.
    pub fn insert(&mut self, digest: Digest, path: impl Into<PathBuf>) {
        self.entries.insert(digest, path.into());
    }

    /// Look up the path currently recorded for `digest`, if any.
    pub fn lookup_one(&self, digest: &Digest) -> Option<&Path> {
        self.entries.get(digest).map(PathBuf::as_path)
    }

    /// The number of distinct digests recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
