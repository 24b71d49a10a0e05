//! Fetch command handler.
//!
//! Runs a single source adapter, bypassing the router.

use clap::Args;
use datagate_core::{config::AppConfig, AppError, AppResult, SourceKey};
use datagate_sources::{create_adapter, create_cache_store, DEFAULT_LIMIT};

/// Query one source directly
#[derive(Args, Debug)]
pub struct FetchCommand {
    /// Source key (relational-user, relational-order, document-project,
    /// external-country, cache) or its legacy name
    pub source: String,

    /// Search term passed to the adapter
    pub term: String,

    /// Maximum records to return
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
}

impl FetchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing fetch command for source '{}'", self.source);

        let key = SourceKey::parse(&self.source).ok_or_else(|| {
            AppError::Source(format!(
                "Unknown source: '{}'. Supported sources: {}",
                self.source,
                SourceKey::ALL
                    .iter()
                    .map(SourceKey::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        let cache = create_cache_store(config)?;
        let adapter = create_adapter(key, config, cache)?;
        let result = adapter.fetch(&self.term, self.limit).await;

        tracing::debug!("{} returned {} record(s)", key, result.record_count());
        println!("{}", result.render(key));

        Ok(())
    }
}
