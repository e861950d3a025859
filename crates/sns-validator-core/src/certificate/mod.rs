//! Signing certificate retrieval.
//!
//! [`CertificateStore`] answers "what is the PEM body behind this URL?" by
//! consulting a [`CertificateCache`] first and a [`CertificateFetcher`] on a
//! miss. Only successful downloads are cached.
//!
//! The fetcher is a trait so the transport can be swapped: production code
//! uses [`HttpCertificateFetcher`], tests supply fakes.

pub mod cache;
pub mod http;

pub use cache::CertificateCache;
pub use http::{FetcherConfig, HttpCertificateFetcher};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::error::{FetchError, ValidationError};

/// Transport that downloads a certificate body.
///
/// Implementations perform exactly one attempt per call and must not cache;
/// caching is the job of [`CertificateStore`].
#[async_trait]
pub trait CertificateFetcher: Send + Sync {
    /// Download the PEM body at `url`.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Cache-backed certificate lookup.
#[derive(Clone)]
pub struct CertificateStore {
    cache: Arc<CertificateCache>,
    fetcher: Arc<dyn CertificateFetcher>,
}

impl CertificateStore {
    /// Create a store with a fresh cache.
    pub fn new(fetcher: Arc<dyn CertificateFetcher>) -> Self {
        Self::with_cache(fetcher, Arc::new(CertificateCache::new()))
    }

    /// Create a store that shares an existing cache.
    pub fn with_cache(fetcher: Arc<dyn CertificateFetcher>, cache: Arc<CertificateCache>) -> Self {
        Self { cache, fetcher }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &Arc<CertificateCache> {
        &self.cache
    }

    /// Return the PEM body for `url`, downloading it on a cache miss.
    ///
    /// Two concurrent misses for the same URL may both download; the cache
    /// keeps whichever body is stored first and both callers receive it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CertificateRetrieval`] when the download
    /// fails. Nothing is cached in that case.
    pub async fn certificate_for(&self, url: &Url) -> Result<Arc<str>, ValidationError> {
        let key = url.as_str();

        if let Some(body) = self.cache.get(key) {
            debug!(url = %key, "Signing certificate served from cache");
            return Ok(body);
        }

        debug!(url = %key, "Signing certificate not cached; fetching");
        let body = self.fetcher.fetch(url).await.map_err(|source| {
            debug!(url = %key, error = %source, "Signing certificate fetch failed");
            ValidationError::CertificateRetrieval {
                url: key.to_string(),
                source,
            }
        })?;

        Ok(self.cache.insert(key, body))
    }
}

impl std::fmt::Debug for CertificateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateStore")
            .field("cached_certificates", &self.cache.len())
            .field("fetcher", &"<dyn CertificateFetcher>")
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
