//! datagate CLI
//!
//! Main entry point for the datagate command-line tool.
//! Routes natural-language queries to relational, document, country and
//! cache sources and prints the gathered text.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, CacheCommand, FetchCommand, RouteCommand};
use datagate_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// datagate - keyword-routed retrieval over heterogeneous data sources
#[derive(Parser, Debug)]
#[command(name = "datagate")]
#[command(about = "Keyword-routed retrieval over heterogeneous data sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "DATAGATE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "DATAGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a query from the routed sources
    Ask(AskCommand),

    /// Show the sources a query routes to
    Route(RouteCommand),

    /// Query one source directly
    Fetch(FetchCommand),

    /// Read or write cache entries
    Cache(CacheCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment and config file
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    )?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("datagate starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Cache backend: {}", config.sources.cache.backend);

    config.ensure_datagate_dir()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Route(_) => "route",
        Commands::Fetch(_) => "fetch",
        Commands::Cache(_) => "cache",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Route(cmd) => cmd.execute(&config).await,
        Commands::Fetch(cmd) => cmd.execute(&config).await,
        Commands::Cache(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
