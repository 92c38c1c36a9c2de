//! Environmental data acquisition engine (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!   locations (config)
//!        │
//!        ▼
//!  ┌──────────────┐  fresh   ┌──────────────┐
//!  │    batch     │─────────▶│    cache     │
//!  │ coordinator  │◀─────────│ (TTL 5 min)  │
//!  └──────┬───────┘  write   └──────────────┘
//!         │ stale / missing
//!         ▼
//!  ┌──────────────┐  cancel  ┌──────────────┐
//!  │   deadline   │◀─────────│ cancellation │◀── Ctrl-C / SIGTERM
//!  │    guard     │          │    scope     │
//!  └──────┬───────┘          └──────────────┘
//!         ▼
//!  ┌──────────────┐
//!  │    source    │──── /air_pollution + /weather ──▶ upstream
//!  │    client    │
//!  └──────────────┘
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use aqi_engine::config::loader::{apply_env_overrides, load_config};
use aqi_engine::config::validation::validate_config;
use aqi_engine::config::watcher::ConfigWatcher;
use aqi_engine::config::{ConfigError, EngineConfig};
use aqi_engine::lifecycle::signals::cancel_on_signal;
use aqi_engine::observability::{logging, metrics};
use aqi_engine::watch::{apply_config_updates, Refresher};
use aqi_engine::{BatchCoordinator, LocationId, OpenWeatherClient};

#[derive(Parser)]
#[command(name = "aqi-engine")]
#[command(about = "Fetch air-quality and weather readings for configured locations", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every configured location once
    Batch,
    /// Fetch a single configured location
    One {
        /// Location id
        id: String,
    },
    /// Refresh all locations on an interval until interrupted
    Watch,
}

fn resolve_config(path: Option<&PathBuf>) -> Result<EngineConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = EngineConfig::default();
            apply_env_overrides(&mut config);
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_ref())?;

    logging::init_logging(&config.observability);
    tracing::info!("aqi-engine v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        locations = config.locations.len(),
        budget_ms = config.deadline.budget_ms,
        ttl_secs = config.cache.ttl_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let client = OpenWeatherClient::new(&config.source)?;
    let coordinator = Arc::new(BatchCoordinator::from_config(client, &config));
    let scope = coordinator.new_scope();
    tokio::spawn(cancel_on_signal(scope.clone()));

    match cli.command {
        Commands::Batch => {
            let readings = coordinator.fetch_all(&config.locations(), &scope).await?;
            println!("{}", serde_json::to_string_pretty(&readings)?);
        }
        Commands::One { id } => {
            let wanted = LocationId::new(id);
            let location = config
                .locations()
                .into_iter()
                .find(|l| l.id == wanted)
                .ok_or_else(|| format!("unknown location id: {}", wanted))?;
            match coordinator.fetch_one(&location, &scope).await {
                Some(reading) => println!("{}", serde_json::to_string_pretty(&reading)?),
                None => tracing::warn!(id = %wanted, "Fetch cancelled before completion"),
            }
        }
        Commands::Watch => {
            let refresher = Refresher::new(coordinator.clone(), config.locations(), config.watch.interval());

            // Keep the notify watcher alive for the whole watch loop.
            let _watcher = match &cli.config {
                Some(path) => {
                    let (watcher, updates) = ConfigWatcher::new(path);
                    tokio::spawn(apply_config_updates(refresher.locations(), updates, scope.clone()));
                    Some(watcher.run()?)
                }
                None => None,
            };

            refresher
                .run(scope.clone(), |readings| match serde_json::to_string(readings) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::error!(error = %e, "Failed to encode readings"),
                })
                .await;
        }
    }

    scope.cancel();
    tracing::info!("Shutdown complete");
    Ok(())
}
