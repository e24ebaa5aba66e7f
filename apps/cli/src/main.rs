//! # venuesync CLI
//!
//! Command-line tools for keeping venue data in sync with the mapping API.
//!
//! ## Commands
//!
//! - `venues` - List the organization's venues
//! - `sync` - Make one collection of a venue match a JSON file
//!
//! Credentials come from the config file or `VENUESYNC_*` environment
//! variables. `RUST_LOG` controls log output unless `-v` is given.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use venuesync_client::ClientConfig;
use venuesync_core::ResourceKind;

use crate::commands::sync::SyncArgs;

/// Venue data sync for the mapping API.
#[derive(Parser)]
#[command(name = "venuesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(global = true, short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the organization's venues
    Venues,

    /// Make one collection of a venue match a JSON file
    Sync {
        /// Collection to sync (layer, place, placeList, connector, beacon, universe)
        #[arg(short, long)]
        kind: ResourceKind,

        /// Venue identifier
        #[arg(long)]
        venue: String,

        /// JSON file holding an array of desired records
        #[arg(short, long)]
        input: PathBuf,

        /// Report the plan without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Only touch server records whose field equals a JSON value (repeatable)
        #[arg(long = "where", value_name = "FIELD=JSON")]
        filters: Vec<String>,

        /// Maximum concurrent requests per phase
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ClientConfig::load(cli.config).context("Failed to load configuration")?;

    match cli.command {
        Commands::Venues => commands::venues::run(&config).await?,
        Commands::Sync {
            kind,
            venue,
            input,
            dry_run,
            filters,
            concurrency,
        } => {
            let args = SyncArgs {
                kind,
                venue,
                input,
                dry_run,
                filters,
                concurrency,
            };
            commands::sync::run(&config, args).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
