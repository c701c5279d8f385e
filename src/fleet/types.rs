//! Fleet service records
//!
//! Shapes follow the fleet service's JSON. Unknown drone states are kept
//! verbatim; which transitions are legal is for the service to decide.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Drone weight class, fixing its payload limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightClass {
    LightWeight,
    MiddleWeight,
    CruiserWeight,
    HeavyWeight,
}

impl WeightClass {
    pub const ALL: [WeightClass; 4] = [
        WeightClass::HeavyWeight,
        WeightClass::MiddleWeight,
        WeightClass::LightWeight,
        WeightClass::CruiserWeight,
    ];

    /// Payload limit in grams
    pub fn weight_limit_grams(&self) -> u32 {
        match self {
            WeightClass::HeavyWeight => 500,
            WeightClass::MiddleWeight => 400,
            WeightClass::LightWeight => 200,
            WeightClass::CruiserWeight => 100,
        }
    }

    /// Wire name, e.g. `HEAVY_WEIGHT`
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightClass::LightWeight => "LIGHT_WEIGHT",
            WeightClass::MiddleWeight => "MIDDLE_WEIGHT",
            WeightClass::CruiserWeight => "CRUISER_WEIGHT",
            WeightClass::HeavyWeight => "HEAVY_WEIGHT",
        }
    }

    /// Human label, e.g. `HEAVY WEIGHT DRONE (500 grams)`
    pub fn label(&self) -> String {
        format!(
            "{} DRONE ({} grams)",
            self.as_str().replace('_', " "),
            self.weight_limit_grams()
        )
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WeightClass {
    type Err = String;

    /// Accepts `HEAVY_WEIGHT`, `heavy-weight`, `heavy` and similar
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        let normalized = normalized.trim_end_matches("_WEIGHT");
        match normalized {
            "LIGHT" => Ok(WeightClass::LightWeight),
            "MIDDLE" => Ok(WeightClass::MiddleWeight),
            "CRUISER" => Ok(WeightClass::CruiserWeight),
            "HEAVY" => Ok(WeightClass::HeavyWeight),
            _ => Err(format!(
                "unknown weight class '{}' (expected light, middle, cruiser or heavy)",
                s
            )),
        }
    }
}

/// Drone lifecycle state as reported by the fleet service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum DroneState {
    Idle,
    Loading,
    Loaded,
    Delivering,
    Delivered,
    Returning,
    /// Any state this client does not know about
    Other(String),
}

impl DroneState {
    pub fn as_str(&self) -> &str {
        match self {
            DroneState::Idle => "IDLE",
            DroneState::Loading => "LOADING",
            DroneState::Loaded => "LOADED",
            DroneState::Delivering => "DELIVERING",
            DroneState::Delivered => "DELIVERED",
            DroneState::Returning => "RETURNING",
            DroneState::Other(s) => s,
        }
    }
}

impl Default for DroneState {
    fn default() -> Self {
        DroneState::Other("UNKNOWN".to_string())
    }
}

impl From<&str> for DroneState {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "IDLE" => DroneState::Idle,
            "LOADING" => DroneState::Loading,
            "LOADED" => DroneState::Loaded,
            "DELIVERING" => DroneState::Delivering,
            "DELIVERED" => DroneState::Delivered,
            "RETURNING" => DroneState::Returning,
            _ => DroneState::Other(s.to_string()),
        }
    }
}

impl From<Option<String>> for DroneState {
    fn from(s: Option<String>) -> Self {
        s.map(|s| DroneState::from(s.as_str())).unwrap_or_default()
    }
}

impl From<DroneState> for String {
    fn from(state: DroneState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for DroneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drone as returned by the fleet service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Drone {
    pub serial_number: String,
    #[serde(default)]
    pub weight_class: Option<WeightClass>,
    #[serde(default)]
    pub weight_limit: f64,
    #[serde(default)]
    pub battery_capacity: Option<u32>,
    #[serde(default)]
    pub state: DroneState,
    /// Ids of the medications currently loaded
    #[serde(default)]
    pub loaded_meds: Vec<String>,
}

/// A medication record; also the body of a load request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Medication {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub img_url: Option<String>,
}

/// Body of a drone registration request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDroneRequest {
    pub weight_class: WeightClass,
}

/// Error body returned by the fleet service
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Drone lists the fleet service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DroneListing {
    All,
    Loaded,
    ForDelivery,
    Delivered,
    Returning,
    Available,
}

impl DroneListing {
    /// Path below `/drones`
    pub fn path(&self) -> &'static str {
        match self {
            DroneListing::All => "",
            DroneListing::Loaded => "/loaded",
            DroneListing::ForDelivery => "/forDelivery",
            DroneListing::Delivered => "/delivered",
            DroneListing::Returning => "/returning",
            DroneListing::Available => "/available",
        }
    }

    /// Noun phrase used in log messages
    pub fn describe(&self) -> &'static str {
        match self {
            DroneListing::All => "all drones",
            DroneListing::Loaded => "loaded drones",
            DroneListing::ForDelivery => "drones ready for delivery",
            DroneListing::Delivered => "delivered drones",
            DroneListing::Returning => "returning drones",
            DroneListing::Available => "idle drones",
        }
    }
}

/// Status-advance requests, one per dashboard button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    SetForDelivery,
    Deliver,
    ReturnDrone,
    MarkIdle,
}

impl Transition {
    /// The transition the dashboard offers for a drone in `state`
    pub fn for_state(state: &DroneState) -> Option<Transition> {
        match state {
            DroneState::Loaded => Some(Transition::SetForDelivery),
            DroneState::Delivering => Some(Transition::Deliver),
            DroneState::Delivered => Some(Transition::ReturnDrone),
            DroneState::Returning => Some(Transition::MarkIdle),
            _ => None,
        }
    }

    /// Last path segment of the PATCH endpoint
    pub fn path(&self) -> &'static str {
        match self {
            Transition::SetForDelivery => "setForDelivery",
            Transition::Deliver => "deliver",
            Transition::ReturnDrone => "returnDrone",
            Transition::MarkIdle => "markIdle",
        }
    }
}
