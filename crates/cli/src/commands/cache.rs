//! Cache command handler.
//!
//! Reads and writes entries in the configured cache store.

use clap::{Args, Subcommand};
use datagate_core::{config::AppConfig, AppError, AppResult};
use datagate_sources::create_cache_store;
use std::time::Duration;

/// Cache store access
#[derive(Args, Debug)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Read a cached value
    Get(CacheGetCommand),
    /// Store a value with a TTL
    Set(CacheSetCommand),
}

impl CacheCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            CacheAction::Get(cmd) => cmd.execute(config).await,
            CacheAction::Set(cmd) => cmd.execute(config).await,
        }
    }
}

/// Read a cached value
#[derive(Args, Debug)]
pub struct CacheGetCommand {
    /// Cache key
    pub key: String,
}

impl CacheGetCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing cache get for '{}'", self.key);

        let store = create_cache_store(config)?;
        match store.get(&self.key).await {
            Some(value) => println!("{}", value),
            None => {
                tracing::info!("No live entry for '{}'", self.key);
            }
        }

        Ok(())
    }
}

/// Store a value
#[derive(Args, Debug)]
pub struct CacheSetCommand {
    /// Cache key
    pub key: String,

    /// Value to store
    pub value: String,

    /// Time to live in seconds (default: configured cache TTL)
    #[arg(long)]
    pub ttl: Option<u64>,
}

impl CacheSetCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing cache set for '{}'", self.key);

        let ttl = Duration::from_secs(self.ttl.unwrap_or(config.sources.cache.ttl_secs));
        let store = create_cache_store(config)?;

        if !store.set(&self.key, &self.value, ttl).await {
            return Err(AppError::Cache(format!(
                "Failed to store '{}' in the {} cache",
                self.key,
                store.backend_name()
            )));
        }

        println!("Stored '{}' for {}s", self.key, ttl.as_secs());
        Ok(())
    }
}
