//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.

use serde::{Deserialize, Serialize};

use crate::dashboard::Notification;
use crate::fleet::{DroneState, WeightClass};

// ============================================
// EVENT DTOs
// ============================================

/// POST /api/v1/events body
#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub message: String,
}

// ============================================
// DRONE DTOs
// ============================================

/// GET /api/v1/drones query string
#[derive(Debug, Default, Deserialize)]
pub struct DronesQuery {
    #[serde(default)]
    pub view: Option<String>,
}

/// POST /api/v1/drones/register body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub weight_class: String,
}

impl RegisterRequest {
    pub fn weight_class(&self) -> Result<WeightClass, String> {
        self.weight_class.parse()
    }
}

/// POST /api/v1/drones/:serial/advance body
///
/// Without a state, or without a body, the drone's current state is looked
/// up first.
#[derive(Debug, Default, Deserialize)]
pub struct AdvanceRequest {
    #[serde(default)]
    pub state: Option<DroneState>,
}

impl AdvanceRequest {
    /// Parse an optional JSON body; blank means no state given
    pub fn from_body(body: &[u8]) -> Result<Self, String> {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| format!("invalid advance request: {}", e))
    }
}

/// Response to a dashboard action
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub notification: Notification,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub event_store: String,
    pub event_key: String,
    pub uptime_seconds: u64,
    pub version: String,
}
