//! Gateway option and response types.

use datagate_core::{AppConfig, SourceKey};
use datagate_router::RouteDecision;
use datagate_sources::{SourceResult, DEFAULT_LIMIT, DEFAULT_TTL};
use serde::Serialize;
use std::time::Duration;

/// How the gateway calls adapters and caches answers.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOptions {
    /// Records requested from each adapter
    pub limit: usize,

    /// Upper bound on a single adapter call
    pub timeout: Duration,

    /// Lifetime of a cached response
    pub cache_ttl: Duration,

    /// Consult and populate the response cache
    pub cache_responses: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            timeout: Duration::from_secs(10),
            cache_ttl: DEFAULT_TTL,
            cache_responses: true,
        }
    }
}

impl GatewayOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            limit: config.gateway.limit,
            timeout: Duration::from_secs(config.gateway.timeout_secs),
            cache_ttl: Duration::from_secs(config.sources.cache.ttl_secs),
            cache_responses: config.gateway.cache_responses,
        }
    }
}

/// One source's contribution to an answer.
#[derive(Debug, Clone)]
pub struct Section {
    pub source: SourceKey,
    pub result: SourceResult,
}

impl Section {
    pub fn text(&self) -> String {
        self.result.render(self.source)
    }
}

/// Everything a fan-out produced, before caching.
#[derive(Debug, Clone)]
pub struct Gathered {
    pub decision: RouteDecision,
    pub sections: Vec<Section>,
}

impl Gathered {
    /// Section texts joined by newlines, in routing order.
    pub fn text(&self) -> String {
        self.sections
            .iter()
            .map(Section::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any section failed.
    pub fn degraded(&self) -> bool {
        self.sections.iter().any(|s| s.result.is_failure())
    }
}

/// Final gateway answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// Concatenated source text
    pub text: String,

    /// Sources the query routed to
    pub sources: Vec<SourceKey>,

    /// Served from the response cache
    pub cached: bool,

    /// At least one source failed
    pub degraded: bool,
}
