//! Ask command handler.
//!
//! Routes a query through the gateway and prints the assembled source text.

use super::print_json;
use clap::Args;
use datagate_core::{config::AppConfig, AppResult};
use datagate_gateway::Gateway;
use datagate_sources::clamp_limit;

/// Answer a query from the routed sources
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The query to answer
    pub query: String,

    /// Records requested from each source
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Bypass the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let mut config = config.clone();
        if let Some(limit) = self.limit {
            config.gateway.limit = clamp_limit(limit);
        }
        if self.no_cache {
            config.gateway.cache_responses = false;
        }

        let gateway = Gateway::from_config(&config)?;
        let response = gateway.answer(&self.query).await;

        if response.degraded {
            tracing::warn!("One or more sources failed; answer is partial");
        }

        if self.json {
            let mut output = serde_json::to_value(&response)?;
            output["query"] = serde_json::Value::String(self.query.clone());
            print_json(&output)?;
        } else {
            println!("{}", response.text);
            tracing::debug!(
                "Answered from {:?} (cached: {})",
                response.sources,
                response.cached
            );
        }

        Ok(())
    }
}
