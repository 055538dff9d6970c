//! Time-bounded cache for provider responses
//!
//! Per-date ratio lookups hit the same quarterly statements hundreds of times
//! in one run, so adapters keep decoded provider payloads here.

use cached::{Cached, TimedCache};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for provider requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Ticker symbol
    pub symbol: String,
    /// Provider endpoint, e.g. `overview` or `statements`
    pub endpoint: String,
}

impl CacheKey {
    pub fn new(symbol: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Thread-safe TTL cache of JSON payloads
pub struct ResponseCache {
    cache: Arc<RwLock<TimedCache<CacheKey, serde_json::Value>>>,
}

impl ResponseCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        // TimedCache evicts on read, so lookups need the write half
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: serde_json::Value) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: CacheKey,
        fetcher: F,
    ) -> Result<serde_json::Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<serde_json::Value, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(symbol = %key.symbol, endpoint = %key.endpoint, "cache hit");
            return Ok(value);
        }

        tracing::debug!(symbol = %key.symbol, endpoint = %key.endpoint, "cache miss");

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.cache.read().await.cache_size()
    }
}

impl Clone for ResponseCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}
