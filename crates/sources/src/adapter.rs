//! Source adapter abstraction.

use crate::result::SourceResult;
use datagate_core::SourceKey;

/// Records returned per source when the caller does not say otherwise.
pub const DEFAULT_LIMIT: usize = 3;

/// Raise a limit below 1 to 1.
pub fn clamp_limit(limit: usize) -> usize {
    limit.max(1)
}

/// A backing store reachable by search term.
///
/// Implementations acquire whatever connection, file or session they need
/// for the duration of one call and release it before returning, on every
/// path. Failures are reported in the returned [`SourceResult`], never by
/// panicking or by propagating an error.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// The source this adapter serves.
    fn key(&self) -> SourceKey;

    /// Look up at most `limit` records matching `term`.
    async fn fetch(&self, term: &str, limit: usize) -> SourceResult;

    /// Look up with [`DEFAULT_LIMIT`].
    async fn fetch_default(&self, term: &str) -> SourceResult {
        self.fetch(term, DEFAULT_LIMIT).await
    }
}
