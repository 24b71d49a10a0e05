//! Key/value cache with per-entry expiry.
//!
//! Cache operations never fail from the caller's point of view: a transport
//! failure is logged and reported as `false` from `set` or `None` from `get`.
//! Expired and absent keys are indistinguishable.

mod memory;
mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use crate::adapter::SourceAdapter;
use crate::result::SourceResult;
use datagate_core::SourceKey;
use std::sync::Arc;
use std::time::Duration;

/// Time-to-live applied when the caller does not pick one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Trait for cache backends.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend name (e.g., "sqlite", "memory").
    fn backend_name(&self) -> &str;

    /// Store `value` under `key` for `ttl`. Returns whether the write landed.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool;

    /// Fetch a live value.
    async fn get(&self, key: &str) -> Option<String>;
}

/// Routed `cache` source: looks the term up as a cache key.
pub struct CacheSource {
    store: Arc<dyn CacheStore>,
}

impl CacheSource {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl SourceAdapter for CacheSource {
    fn key(&self) -> SourceKey {
        SourceKey::Cache
    }

    async fn fetch(&self, term: &str, _limit: usize) -> SourceResult {
        let lines = self
            .store
            .get(term.trim())
            .await
            .map(|value| format!("{}: {}", self.key().tag().record, value))
            .into_iter()
            .collect();

        SourceResult::from_lines(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_source_hit() {
        let store = Arc::new(MemoryCache::new(16));
        assert!(store.set("deploy", "green", DEFAULT_TTL).await);

        let source = CacheSource::new(store);
        let result = source.fetch(" deploy ", 3).await;
        assert_eq!(
            result,
            SourceResult::Records(vec!["CACHE_DATA: green".to_string()])
        );
    }

    #[tokio::test]
    async fn test_cache_source_miss() {
        let source = CacheSource::new(Arc::new(MemoryCache::new(16)));
        let result = source.fetch("live status", 3).await;
        assert_eq!(
            result.render(source.key()),
            "CACHE_DATA: No relevant cached data found."
        );
    }
}
