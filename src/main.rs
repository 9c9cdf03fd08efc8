//! loadout - inspect and validate persisted inventory snapshots
//!
//! Reads a JSON dump of an entity property store and decodes the armor/inventory
//! sequences written by `loadout-snapshot`.

mod commands;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::LoadoutConfig;
use loadout_core::MemoryPropertyStore;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect persisted inventory/equipment snapshots", long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Property store dump (JSON); overrides `store_path` from the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List snapshot names found in the store
    List,
    /// Show the decoded contents of one snapshot
    Inspect {
        /// Snapshot name (an entity identifier or a custom name)
        #[arg(long)]
        name: String,

        /// Print the stored payloads as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Check every snapshot for unreadable payloads, malformed items and torn writes
    Validate,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    info!("Starting loadout v{}", env!("CARGO_PKG_VERSION"));

    let config = LoadoutConfig::load_from_path(&args.config);
    let store_path = args.store.unwrap_or(config.store_path);
    let store = MemoryPropertyStore::load(&store_path)
        .with_context(|| format!("Failed to load property store {}", store_path.display()))?;
    debug!(path = %store_path.display(), properties = store.len(), "property store loaded");

    let output = match args.command {
        Command::List => commands::list(&store, &config.keys),
        Command::Inspect { name, json } => commands::inspect(&store, &config.keys, &name, json)?,
        Command::Validate => {
            let report = commands::validate(&store, &config.keys);
            for issue in &report.issues {
                println!("{issue}");
            }
            if !report.is_ok() {
                bail!(
                    "{} problem(s) found in {} snapshot(s)",
                    report.issues.len(),
                    report.snapshots
                );
            }
            println!("{} snapshot(s) ok", report.snapshots);
            return Ok(());
        }
    };

    for line in output.lines {
        println!("{line}");
    }
    Ok(())
}
