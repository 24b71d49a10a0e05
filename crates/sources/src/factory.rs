//! Adapter and cache store factory.
//!
//! Builds the adapter bound to each source key from application
//! configuration, in the same way for the CLI and for tests that load a
//! config file.

use crate::adapter::SourceAdapter;
use crate::cache::{CacheSource, CacheStore, MemoryCache, SqliteCache};
use crate::country::CountrySource;
use crate::document::ProjectSource;
use crate::relational::{OrderSource, UserSource};
use datagate_core::{AppConfig, AppError, AppResult, SourceKey};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Adapter bound to each source key.
pub type AdapterMap = HashMap<SourceKey, Arc<dyn SourceAdapter>>;

/// Create the cache store named by `sources.cache.backend`.
pub fn create_cache_store(config: &AppConfig) -> AppResult<Arc<dyn CacheStore>> {
    let cache = &config.sources.cache;
    match cache.backend.to_lowercase().as_str() {
        "sqlite" => Ok(Arc::new(SqliteCache::new(config.cache_path()))),
        "memory" => Ok(Arc::new(MemoryCache::new(cache.max_entries))),
        other => Err(AppError::Cache(format!(
            "Unknown cache backend: '{}'. Supported backends: sqlite, memory",
            other
        ))),
    }
}

/// Create the adapter for one source.
pub fn create_adapter(
    key: SourceKey,
    config: &AppConfig,
    cache: Arc<dyn CacheStore>,
) -> AppResult<Arc<dyn SourceAdapter>> {
    let adapter: Arc<dyn SourceAdapter> = match key {
        SourceKey::RelationalUser => Arc::new(UserSource::new(config.database_path())),
        SourceKey::RelationalOrder => Arc::new(OrderSource::new(config.database_path())),
        SourceKey::DocumentProject => Arc::new(ProjectSource::new(config.documents_path())),
        SourceKey::ExternalCountry => Arc::new(CountrySource::new(
            config.sources.country_url.clone(),
            Duration::from_secs(config.gateway.timeout_secs),
        )?),
        SourceKey::Cache => Arc::new(CacheSource::new(cache)),
    };

    Ok(adapter)
}

/// Create adapters for every source key.
pub fn create_adapters(config: &AppConfig, cache: Arc<dyn CacheStore>) -> AppResult<AdapterMap> {
    let mut adapters = HashMap::with_capacity(SourceKey::ALL.len());

    for key in SourceKey::ALL {
        let adapter = create_adapter(key, config, cache.clone())?;
        adapters.insert(key, adapter);
    }

    tracing::debug!("Created {} source adapters", adapters.len());
    Ok(adapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_all_adapters() {
        let config = AppConfig::default();
        let cache = create_cache_store(&config).unwrap();
        let adapters = create_adapters(&config, cache).unwrap();

        assert_eq!(adapters.len(), SourceKey::ALL.len());
        for (key, adapter) in &adapters {
            assert_eq!(adapter.key(), *key);
        }
    }

    #[test]
    fn test_memory_backend() {
        let mut config = AppConfig::default();
        config.sources.cache.backend = "memory".to_string();

        let store = create_cache_store(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[test]
    fn test_unknown_backend() {
        let mut config = AppConfig::default();
        config.sources.cache.backend = "redis".to_string();

        match create_cache_store(&config) {
            Err(err) => assert!(err.to_string().contains("Unknown cache backend")),
            Ok(_) => panic!("Expected error for unknown backend"),
        }
    }
}
