//! # DroneDesk
//!
//! Operator dashboard for a drone medication-delivery fleet. The fleet
//! service owns the drones; DroneDesk shows them, forwards operator
//! actions, and keeps a local append-only log of what happened.
//!
//! ## Modules
//!
//! - [`events`]: Persisted event log behind a pluggable `EventStore`
//! - [`fleet`]: Typed REST client for the fleet service
//! - [`dashboard`]: Views, actions, notifications and follow-ups
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`telemetry`]: Logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dronedesk::{build_dashboard, Config, DroneView};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dashboard = build_dashboard(&Config::load_default())?;
//!
//!     let loaded = dashboard.drones(DroneView::Loaded).await;
//!     println!("{}: {} drones", loaded.title, loaded.items.len());
//!
//!     for event in dashboard.events().await.events {
//!         println!("{} {}", event.display_time(), event.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod fleet;
pub mod telemetry;

use anyhow::Context;
use std::sync::Arc;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, EventsConfig, FleetSection, LoggingConfig, ServerConfig};

pub use dashboard::{
    Dashboard, DroneCard, DroneDetail, DroneView, EventsView, FollowUp, HomeView, ListView,
    MedicationForm, Notification, NotificationKind, RegisterOutcome,
};

pub use events::{
    open_store, Event, EventError, EventLog, EventStore, FileStore, MemoryStore, SqliteStore,
    StoreBackend, StoreError,
};

pub use fleet::{
    Drone, DroneState, FleetApi, FleetClient, FleetConfig, FleetError, Medication, Transition,
    WeightClass,
};

/// Wire a dashboard from configuration: fleet client, event store and log
pub fn build_dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    let fleet = FleetClient::new(config.fleet.client_config())
        .context("Failed to create fleet client")?;

    events::validate_key(&config.events.key)
        .with_context(|| format!("Invalid event log key {:?}", config.events.key))?;

    let data_dir = config.events.data_path();
    let store = open_store(config.events.backend, &data_dir, config.events.quota_bytes)
        .with_context(|| format!("Failed to open event store in {:?}", data_dir))?;
    let log = EventLog::with_key(store, config.events.key.clone());

    Ok(Dashboard::new(Arc::new(fleet), Arc::new(log))
        .with_follow_up_delay(config.server.follow_up_delay()))
}
