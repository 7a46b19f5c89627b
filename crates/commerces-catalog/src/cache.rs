//! Time-boxed memoization of full catalog fetches.
//!
//! Entries are keyed by the catalog URL and expire strictly by elapsed time.
//! Each URL has its own slot lock, held across a miss-and-fetch: concurrent
//! callers for the same URL trigger one fetch and share its result, while
//! fetches for different URLs proceed independently.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use commerces_core::Dataset;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::FetchError;

struct CacheEntry {
    dataset: Arc<Dataset>,
    /// `None` when `fetched_at + ttl` overflows; such an entry never expires.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

pub struct FetchCache {
    ttl: Duration,
    /// Only locked long enough to look up or create a slot.
    slots: Mutex<HashMap<String, Slot>>,
}

impl FetchCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached dataset for `key`, or runs `fetch` and caches its
    /// result for the configured TTL.
    ///
    /// Failed fetches are not cached; an expired entry is dropped before
    /// refetching.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `fetch`.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        fetch: F,
    ) -> Result<Arc<Dataset>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Dataset, FetchError>>,
    {
        let slot = self.slot(key).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(Instant::now()) {
                tracing::debug!(key, records = cached.dataset.len(), "catalog cache hit");
                return Ok(Arc::clone(&cached.dataset));
            }
            tracing::debug!(key, "catalog cache entry expired");
            *entry = None;
        }

        let dataset = Arc::new(fetch().await?);
        *entry = Some(CacheEntry {
            dataset: Arc::clone(&dataset),
            expires_at: Instant::now().checked_add(self.ttl),
        });
        Ok(dataset)
    }

    async fn slot(&self, key: &str) -> Slot {
        let mut slots = self.slots.lock().await;
        Arc::clone(
            slots
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(None))),
        )
    }
}
