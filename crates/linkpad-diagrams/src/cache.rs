//! Content-addressed cache for rendered diagram markup.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

/// Compute the cache key for a piece of diagram source text.
///
/// The key covers the source text and nothing else. Theme is deliberately
/// not part of it: a theme switch invalidates every entry at once via
/// [`DiagramCache::clear`], so stale markup for the old theme can never
/// be served.
#[must_use]
pub fn source_key(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-memory cache mapping diagram source text to rendered markup.
///
/// Two diagrams with byte-identical source share one entry, whether they
/// appear in the same document or across consecutive render passes.
#[derive(Debug, Default)]
pub struct DiagramCache {
    entries: HashMap<String, String>,
}

impl DiagramCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up rendered markup for the given source text.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(&source_key(source)).map(String::as_str)
    }

    /// Store rendered markup for the given source text.
    pub fn insert(&mut self, source: &str, markup: String) {
        self.entries.insert(source_key(source), markup);
    }

    /// Drop every entry. Called when the preview theme changes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
