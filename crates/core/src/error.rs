//! Error types for datagate.
//!
//! This module defines a unified error enum covering the application-level
//! failure categories: configuration, I/O, sources, cache, routing and
//! serialization. Adapter failures never reach this type at query time; they
//! are degraded to in-band sentinel text at the adapter boundary.

use thiserror::Error;

/// Unified error type for datagate.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source adapter construction errors
    #[error("Source error: {0}")]
    Source(String),

    /// Cache store errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Routing rule errors
    #[error("Routing error: {0}")]
    Routing(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
