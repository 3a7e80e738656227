mod activities;
mod config;
mod db;
mod error;
mod fallback;
mod models;
mod participants;
mod web;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use db::Database;

/// Mergington High School activities: list activities and sign students up.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the activities API server
    Serve {
        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,

        /// Listen address (e.g. "127.0.0.1:8000")
        #[arg(short = 'a', long, default_value = "0.0.0.0:8000")]
        addr: String,
    },

    /// Create the activities table and seed it if it is empty
    InitDb {
        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Serve { config, addr } => {
            let cfg = config::load_config(config)?;
            web::serve(cfg, addr).await?;
        }
        Command::InitDb { config } => {
            let cfg = config::load_config(config)?;
            let url = config::database_url(&cfg);
            let db = Database::connect_lazy(&url)
                .with_context(|| format!("Invalid database URL {url}"))?;
            db.init_schema()
                .await
                .with_context(|| format!("Failed to create schema in {url}"))?;
            db.seed_if_empty()
                .await
                .context("Failed to seed activities")?;
            let count = db.count_activities().await?;
            info!("Database ready at {} ({} activities)", url, count);
        }
    }

    Ok(())
}
