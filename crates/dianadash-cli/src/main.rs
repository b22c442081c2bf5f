//! DianaDash - command-line client for the DianaBot admin dashboard API.
//!
//! Stores the dashboard bearer token between runs and sends authenticated
//! requests with it, logging out automatically when the API rejects it.

mod commands;
mod logging;
mod navigator;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dianadash_core::config::{Config, TokenStoreKind};
use dianadash_core::Dashboard;
use tracing::{debug, info};

use commands::Commands;
use navigator::ConsoleNavigator;

#[derive(Parser)]
#[command(name = "dianadash")]
#[command(about = "Command-line client for the DianaBot dashboard API")]
#[command(version)]
struct Cli {
    /// API base URL (overrides config and DIANADASH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Keep the token in memory only for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Write logs to a daily-rolling file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let _log_guard = logging::init_tracing(cli.log_dir.as_deref());
    info!("DianaDash starting");

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if cli.ephemeral {
        config.token_store = TokenStoreKind::Memory;
    }
    debug!(api = %config.api_base_url, store = ?config.token_store, "Configuration loaded");

    let navigator = Arc::new(ConsoleNavigator::new("/"));
    let dashboard = Dashboard::from_config(&config, navigator)?;

    cli.command.execute(&dashboard, &mut config).await
}
