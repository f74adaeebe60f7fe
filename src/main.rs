/// Main application entry point
mod cli;
mod clients;
mod config;
mod domain;
mod errors;
mod geo;
mod handlers;
mod repo;
mod routes;
mod services;
mod utils;
mod view;

use crate::clients::OpenSkyClient;
use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::repo::{SnapshotRepo, StateCache};
use crate::routes::build_router;
use crate::services::{TrackerService, TrackerSettings};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "airtracker", version, about = "Flight tracking over the OpenSky states feed")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web API server
    Serve {
        /// Bind address, e.g. 0.0.0.0:3000
        #[arg(short, long, env = "BIND_ADDR")]
        bind: Option<String>,
    },
    /// Track one aircraft interactively in the terminal
    Track {
        /// Callsign to track, skipping the interactive selection
        #[arg(short, long)]
        callsign: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let args = Cli::parse();

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    // Initialize client, storage and service
    let client = OpenSkyClient::new(
        config.opensky_url.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    )?;
    let cache = StateCache::new(Duration::from_secs(config.cache_ttl_secs));
    let snapshots = SnapshotRepo::new(&config.snapshot_path);
    let tracker = Arc::new(TrackerService::new(
        client,
        cache,
        snapshots,
        TrackerSettings {
            offline_mode: config.offline_mode,
            save_snapshot: config.save_snapshot,
            max_list: config.max_list,
            on_ground_policy: config.on_ground_policy,
            annotate_fallback: config.annotate_fallback,
        },
    ));

    match args.command {
        Commands::Serve { bind } => {
            let state = AppState {
                tracker: tracker.clone(),
            };
            let app = build_router(state, config.cors_allow_origin.clone());

            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("airtracker service listening on {addr}");

            axum::serve(listener, app.into_make_service()).await?;
        }
        Commands::Track { callsign } => {
            cli::run_tracker(&tracker, &config.track, callsign).await?;
        }
    }

    Ok(())
}
