//! Fleet Service Integration
//!
//! The fleet service is the external REST API that owns drones,
//! medications and the delivery state machine. This module only speaks
//! its protocol.
//!
//! - **types**: Drone, Medication, WeightClass, DroneState, Transition
//! - **client**: `FleetClient`, the reqwest implementation of `FleetApi`
//! - **error**: Error types

pub mod client;
pub mod error;
pub mod types;

pub use client::{FleetClient, FleetConfig};
pub use error::{FleetError, FleetResult};
pub use types::{
    Drone, DroneListing, DroneState, Medication, RegisterDroneRequest, ServiceError, Transition,
    WeightClass,
};

use async_trait::async_trait;

/// Operations the dashboard needs from the fleet service
#[async_trait]
pub trait FleetApi: Send + Sync {
    /// List drones, optionally restricted to one status
    async fn list_drones(&self, listing: DroneListing) -> FleetResult<Vec<Drone>>;

    /// Look up one drone
    async fn get_drone(&self, serial_number: &str) -> FleetResult<Option<Drone>>;

    /// Medications currently loaded on a drone
    async fn drone_medications(&self, serial_number: &str) -> FleetResult<Vec<Medication>>;

    /// Battery level in percent
    async fn battery_level(&self, serial_number: &str) -> FleetResult<u32>;

    /// Every medication the service knows
    async fn list_medications(&self) -> FleetResult<Vec<Medication>>;

    /// Look up one medication by id
    async fn get_medication(&self, id: &str) -> FleetResult<Option<Medication>>;

    /// Register a new drone of the given class
    async fn register_drone(&self, weight_class: WeightClass) -> FleetResult<Option<Drone>>;

    /// Load a medication onto a drone
    async fn load_medication(&self, serial_number: &str, medication: &Medication) -> FleetResult<()>;

    /// Ask the service to advance a drone's delivery status
    async fn advance(&self, serial_number: &str, transition: Transition) -> FleetResult<()>;
}
