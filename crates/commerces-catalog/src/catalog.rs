//! Cached entry point combining [`CatalogClient`] and [`FetchCache`].

use std::sync::Arc;
use std::time::Duration;

use commerces_core::{AppConfig, Dataset};

use crate::cache::FetchCache;
use crate::client::CatalogClient;
use crate::error::FetchError;

/// Fetches and normalizes catalog datasets, memoizing each URL for the
/// cache TTL.
pub struct Catalog {
    client: CatalogClient,
    cache: FetchCache,
}

impl Catalog {
    #[must_use]
    pub fn new(client: CatalogClient, ttl: Duration) -> Self {
        Self {
            client,
            cache: FetchCache::new(ttl),
        }
    }

    /// Builds a catalog from the request and cache settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let client = CatalogClient::new(config.request_timeout_secs, &config.user_agent)?;
        Ok(Self::new(client, config.cache_ttl()))
    }

    /// Returns the dataset at `base_url`, fetching it only when no fresh
    /// cached copy exists.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`CatalogClient::fetch_all`]. Errors are
    /// never cached.
    pub async fn load(&self, base_url: &str) -> Result<Arc<Dataset>, FetchError> {
        let client = &self.client;
        self.cache
            .get_or_fetch(base_url, move || client.fetch_all(base_url))
            .await
    }
}
