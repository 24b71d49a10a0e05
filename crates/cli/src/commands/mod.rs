//! Command handlers for the datagate CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod cache;
pub mod fetch;
pub mod route;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use cache::CacheCommand;
pub use fetch::FetchCommand;
pub use route::RouteCommand;

use datagate_core::{AppError, AppResult};

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json(value: &serde_json::Value) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
