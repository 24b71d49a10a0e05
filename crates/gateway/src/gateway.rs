//! Fan-out and response caching.

use crate::types::{Gathered, GatewayOptions, GatewayResponse, Section};
use datagate_core::{AppConfig, AppResult, SourceKey};
use datagate_router::{RouteDecision, Router};
use datagate_sources::{
    create_adapters, create_cache_store, AdapterMap, CacheStore, SourceError, SourceResult,
};
use futures::future::join_all;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Prefix of response cache keys.
const RESPONSE_KEY_PREFIX: &str = "response:";

/// Cache key for a query's assembled response at a given per-source limit.
///
/// Queries differing only in case or surrounding whitespace share a key.
/// Different limits never do.
pub fn cache_key(query: &str, limit: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}\n{}", limit, query.trim().to_lowercase()).as_bytes());
    format!("{}{:x}", RESPONSE_KEY_PREFIX, hasher.finalize())
}

/// Router plus the adapter bound to each source.
pub struct Gateway {
    router: Router,
    adapters: AdapterMap,
    cache: Option<Arc<dyn CacheStore>>,
    options: GatewayOptions,
}

impl Gateway {
    /// Create a gateway without a response cache.
    pub fn new(router: Router, adapters: AdapterMap, options: GatewayOptions) -> Self {
        Self {
            router,
            adapters,
            cache: None,
            options,
        }
    }

    /// Attach a response cache.
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the router, cache store and adapters described by `config`.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let router = Router::new(&config.routing);
        let cache = create_cache_store(config)?;
        let adapters = create_adapters(config, cache.clone())?;

        tracing::debug!(
            "Gateway ready with {} adapters and '{}' cache",
            adapters.len(),
            cache.backend_name()
        );

        Ok(Self::new(router, adapters, GatewayOptions::from_config(config)).with_cache(cache))
    }

    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    /// Routing decision for `query`, without fetching anything.
    pub fn route(&self, query: &str) -> RouteDecision {
        self.router.decide(query)
    }

    /// Route `query` and collect every routed source's result.
    ///
    /// Adapters run concurrently. A failed, slow or unbound source yields a
    /// failure section and never prevents the others from completing.
    pub async fn gather(&self, query: &str) -> Gathered {
        let decision = self.router.decide(query);
        tracing::info!(
            "Gathering from {} source(s): {:?}",
            decision.sources.len(),
            decision.sources
        );

        let calls = decision
            .sources
            .iter()
            .map(|&source| self.fetch_one(source, query));
        let results = join_all(calls).await;

        let sections = decision
            .sources
            .iter()
            .zip(results)
            .map(|(&source, result)| Section { source, result })
            .collect();

        Gathered { decision, sections }
    }

    /// Answer `query`, serving and populating the response cache.
    ///
    /// Degraded answers are returned but not cached.
    pub async fn answer(&self, query: &str) -> GatewayResponse {
        let cache = self.cache.as_ref().filter(|_| self.options.cache_responses);
        let key = cache_key(query, self.options.limit);

        if let Some(cache) = cache {
            if let Some(text) = cache.get(&key).await {
                tracing::info!("Serving cached response");
                return GatewayResponse {
                    text,
                    sources: self.router.route(query),
                    cached: true,
                    degraded: false,
                };
            }
        }

        let gathered = self.gather(query).await;
        let text = gathered.text();
        let degraded = gathered.degraded();

        if let Some(cache) = cache {
            if degraded {
                tracing::info!("Not caching degraded response");
            } else if !cache.set(&key, &text, self.options.cache_ttl).await {
                tracing::warn!("Response could not be cached");
            }
        }

        GatewayResponse {
            text,
            sources: gathered.decision.sources,
            cached: false,
            degraded,
        }
    }

    /// Run one source's adapter under the per-adapter timeout.
    pub async fn fetch_one(&self, source: SourceKey, term: &str) -> SourceResult {
        let Some(adapter) = self.adapters.get(&source) else {
            tracing::warn!("No adapter bound for {}", source);
            return SourceResult::Failure(format!("no adapter bound for source '{}'", source));
        };

        match tokio::time::timeout(self.options.timeout, adapter.fetch(term, self.options.limit))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "{} did not answer within {:?}",
                    source,
                    self.options.timeout
                );
                SourceResult::Failure(SourceError::Timeout(self.options.timeout).to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_stable_and_normalized() {
        let a = cache_key("What is the capital of Germany?", 3);
        let b = cache_key("  what is the CAPITAL of germany?\n", 3);
        assert_eq!(a, b);
        assert!(a.starts_with(RESPONSE_KEY_PREFIX));
        assert_eq!(a.len(), RESPONSE_KEY_PREFIX.len() + 64);
    }

    #[test]
    fn test_cache_key_differs_per_query() {
        assert_ne!(cache_key("user", 3), cache_key("order", 3));
    }

    #[test]
    fn test_cache_key_differs_per_limit() {
        assert_ne!(cache_key("staff", 1), cache_key("staff", 4));
    }
}
