//! DroneDesk Server
//!
//! Serves the operator dashboard API.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use dronedesk::telemetry::{init_logging, LogTarget};
use dronedesk::{build_dashboard, serve, AppState, Config};

#[derive(Parser)]
#[command(name = "dronedesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator dashboard server for a drone delivery fleet")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_logging(&config.logging, LogTarget::Stdout);

    tracing::info!("DroneDesk v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Fleet service: {}", config.fleet.url);
    tracing::info!(
        "Event log: {:?} backend in {:?}",
        config.events.backend,
        config.events.data_path()
    );

    let dashboard = build_dashboard(&config)?;
    let state = AppState::new(Arc::new(dashboard), config.server.clone());

    serve(state, &config.server)
        .await
        .context("API server failed")?;

    Ok(())
}
