//! Keyword router.

use datagate_core::config::{MultiSourceRule, RoutingConfig};
use datagate_core::SourceKey;
use serde::Serialize;

/// Which routing branch produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteReason {
    /// Both trigger lists of the multi-source rule matched
    MultiSource,
    /// One or more keyword rules matched
    Keywords,
    /// Nothing matched
    Fallback,
}

/// Sources to consult for a query, in consultation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub sources: Vec<SourceKey>,
    pub reason: RouteReason,
}

/// Normalized keyword rules.
#[derive(Debug, Clone)]
pub struct Router {
    keywords: Vec<(SourceKey, Vec<String>)>,
    multi_source: Option<(Vec<String>, Vec<String>, [SourceKey; 2])>,
    fallback: SourceKey,
}

impl Router {
    /// Build a router from routing rules.
    ///
    /// Trigger words are lower-cased and trimmed; blank words are dropped
    /// since an empty needle is contained in every query.
    pub fn new(config: &RoutingConfig) -> Self {
        let keywords = config
            .keywords
            .iter()
            .map(|rule| (rule.source, normalize_words(&rule.words)))
            .collect();

        let multi_source = config.multi_source.as_ref().map(
            |MultiSourceRule {
                 project_triggers,
                 people_triggers,
                 sources,
             }| {
                (
                    normalize_words(project_triggers),
                    normalize_words(people_triggers),
                    *sources,
                )
            },
        );

        Self {
            keywords,
            multi_source,
            fallback: config.fallback,
        }
    }

    /// Sources to consult for `query`. Never empty, never fails.
    pub fn route(&self, query: &str) -> Vec<SourceKey> {
        self.decide(query).sources
    }

    /// Route `query` and report which branch fired.
    pub fn decide(&self, query: &str) -> RouteDecision {
        let query = query.to_lowercase();

        if let Some((ref project, ref people, pair)) = self.multi_source {
            if contains_any(&query, project) && contains_any(&query, people) {
                tracing::info!(
                    "Routing multi-source query to {} + {}",
                    pair[0],
                    pair[1]
                );
                return RouteDecision {
                    sources: dedup(pair.to_vec()),
                    reason: RouteReason::MultiSource,
                };
            }
        }

        let matched: Vec<SourceKey> = self
            .keywords
            .iter()
            .filter(|(_, words)| contains_any(&query, words))
            .map(|(source, _)| *source)
            .collect();

        if matched.is_empty() {
            tracing::info!("No keyword matched, falling back to {}", self.fallback);
            return RouteDecision {
                sources: vec![self.fallback],
                reason: RouteReason::Fallback,
            };
        }

        let sources = dedup(matched);
        tracing::debug!("Keyword routing selected {:?}", sources);

        RouteDecision {
            sources,
            reason: RouteReason::Keywords,
        }
    }
}

fn normalize_words(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

/// Drop repeats, keeping first-seen order.
fn dedup(sources: Vec<SourceKey>) -> Vec<SourceKey> {
    let mut seen = Vec::with_capacity(sources.len());
    for source in sources {
        if !seen.contains(&source) {
            seen.push(source);
        }
    }
    seen
}
