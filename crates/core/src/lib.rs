//! Datagate Core Library
//!
//! This crate provides the foundational pieces shared by every datagate crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The source vocabulary (`SourceKey`, `SourceTag`)

pub mod config;
pub mod error;
pub mod logging;
pub mod source;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use source::{SourceKey, SourceTag};
