//! Route command handler.
//!
//! Shows which sources a query selects without contacting any store.

use super::print_json;
use clap::Args;
use datagate_core::{config::AppConfig, AppResult};
use datagate_router::{RouteReason, Router};

/// Show the sources a query routes to
#[derive(Args, Debug)]
pub struct RouteCommand {
    /// The query to route
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RouteCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing route command");

        config.routing.validate()?;
        let decision = Router::new(&config.routing).decide(&self.query);

        if self.json {
            let output = serde_json::json!({
                "query": self.query,
                "sources": decision.sources,
                "reason": decision.reason,
            });
            print_json(&output)?;
        } else {
            let reason = match decision.reason {
                RouteReason::MultiSource => "multi-source override",
                RouteReason::Keywords => "keyword match",
                RouteReason::Fallback => "fallback",
            };
            println!("Routed by {}:", reason);
            for source in &decision.sources {
                println!("  {} ({})", source, source.tag().record);
            }
        }

        Ok(())
    }
}
