//! Adapter failure taxonomy.
//!
//! These never cross the adapter boundary as errors. A `SourceError` becomes a
//! [`crate::SourceResult::Failure`]; a `CacheError` is logged and absorbed.

use std::time::Duration;
use thiserror::Error;

/// Why a source lookup failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The backing store could not be reached or opened
    #[error("connection failed: {0}")]
    Connection(String),

    /// The store was reached but the lookup failed
    #[error("query failed: {0}")]
    Query(String),

    /// The lookup did not finish in time
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Why a cache operation failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SourceError::Connection("refused".to_string()).to_string(),
            "connection failed: refused"
        );
        assert_eq!(
            SourceError::Timeout(Duration::from_secs(10)).to_string(),
            "timed out after 10s"
        );
    }
}
