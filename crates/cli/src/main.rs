//! linkrag CLI
//!
//! Main entry point for the linkrag command-line tool: a minimal
//! retrieval-augmented-generation demonstration over a fixed set of web
//! pages.

mod commands;
mod pipeline;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChunksCommand};
use linkrag_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// linkrag - answer questions from a fixed set of web pages
#[derive(Parser, Debug)]
#[command(name = "linkrag")]
#[command(about = "Retrieval-augmented answering over a fixed set of web pages", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true, env = "LINKRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "LINKRAG_MODEL")]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible generation endpoint
    #[arg(long, global = true, env = "LINKRAG_API_BASE")]
    api_base: Option<String>,

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
    /// Answer a question from the configured pages
    Ask(AskCommand),

    /// Show the ranked chunks for a query without generating an answer
    Chunks(ChunksCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Seed the environment from .env before anything reads it
    dotenvy::dotenv().ok();

    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.model,
        cli.api_base,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("linkrag starting");
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Endpoint: {}", config.api_base);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chunks(_) => "chunks",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chunks(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
