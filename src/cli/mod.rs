//! Command line interface
//!
//! - `serve`: run the HTTP API
//! - `migrate`: manage the PostgreSQL schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Knowledge base manager - document storage and processing lifecycle
#[derive(Debug, Parser)]
#[command(name = "kb-manager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply, revert or inspect PostgreSQL schema migrations
    Migrate(migrate::MigrateArgs),
}

/// Load `.env`, the layered configuration and the tracing subscriber
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });

    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("Logging already initialized: {}", e);
    }

    config
}
