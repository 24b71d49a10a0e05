//! In-process cache using moka, with the TTL carried per entry.

use super::CacheStore;
use moka::sync::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after its own TTL; an overwrite restarts the clock.
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Memory-backed cache store. Contents do not survive the process.
pub struct MemoryCache {
    cache: Cache<String, Entry>,
}

impl MemoryCache {
    /// Create a cache holding at most `max_entries` values.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCache {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> bool {
        self.cache.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                ttl,
            },
        );
        true
    }

    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).map(|entry| entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new(8);
        assert!(cache.set("k", "System Operational", Duration::from_secs(60)).await);
        assert_eq!(cache.get("k").await.as_deref(), Some("System Operational"));
    }

    #[tokio::test]
    async fn test_unset_key_is_none() {
        let cache = MemoryCache::new(8);
        assert_eq!(cache.get("never-set").await, None);
    }

    #[tokio::test]
    async fn test_expired_key_is_none() {
        let cache = MemoryCache::new(8);
        assert!(cache.set("k", "short lived", Duration::from_millis(10)).await);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = MemoryCache::new(8);
        cache.set("k", "old", Duration::from_secs(60)).await;
        cache.set("k", "new", Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("new"));
    }
}
