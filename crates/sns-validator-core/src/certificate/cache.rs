//! In-memory signing certificate cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Write-once cache of certificate PEM bodies keyed by URL.
///
/// Entries never expire. Once a body is stored for a URL it is never replaced,
/// so concurrent fetches of the same URL converge on the first stored body.
/// A certificate rotated in place at the same URL is not picked up until the
/// cache is dropped.
///
/// The map is guarded by a [`RwLock`]. Every critical section is a single map
/// operation, so a poisoned lock still guards a consistent map and is
/// recovered rather than propagated.
#[derive(Debug, Default)]
pub struct CertificateCache {
    entries: RwLock<HashMap<String, Arc<str>>>,
}

impl CertificateCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the body stored for `url`.
    pub fn get(&self, url: &str) -> Option<Arc<str>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(url).cloned()
    }

    /// Store `body` for `url` unless a body is already stored.
    ///
    /// Returns the body now associated with `url`, which is the previously
    /// stored one if there was one.
    pub fn insert(&self, url: impl Into<String>, body: impl Into<Arc<str>>) -> Arc<str> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(url.into()).or_insert_with(|| body.into()).clone()
    }

    pub fn contains(&self, url: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
