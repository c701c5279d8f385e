//! Event record types
//!
//! - `Event`: one immutable entry in the log
//! - `seed_events`: the entries materialized when no log exists yet

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped, human-readable record of something notable
///
/// Serialized as `{"id", "message", "timeStamp"}` so logs written by the
/// browser dashboard can be read back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Stable unique identifier, never reused
    pub id: String,
    /// Free-text description
    pub message: String,
    /// When the event was recorded (UTC, millisecond precision)
    #[serde(rename = "timeStamp", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Create an event with a fresh id, recorded now
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_timestamp(message, Utc::now())
    }

    /// Create an event with a fresh id and an explicit timestamp
    pub fn with_timestamp(message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.into(),
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    /// Timestamp formatted for display, e.g. `Jul 17, 2025, 10:21 PM`
    pub fn display_time(&self) -> String {
        self.timestamp.format("%b %-d, %Y, %-I:%M %p").to_string()
    }
}

/// Events shown on first use so the log view is never empty
pub fn seed_events() -> Vec<Event> {
    let at = |minute: u32| {
        Utc.with_ymd_and_hms(2025, 7, 17, 22, minute, 0)
            .single()
            .unwrap_or_default()
    };

    vec![
        Event {
            id: "56HYUHF-89".to_string(),
            message: "Drone Alpha loaded successfully".to_string(),
            timestamp: at(21),
        },
        Event {
            id: "76YOOMG-90".to_string(),
            message: "Drone Beta dispatched for delivery".to_string(),
            timestamp: at(20),
        },
        Event {
            id: "44ROOOF-99".to_string(),
            message: "Drone Gamma returned to base".to_string(),
            timestamp: at(19),
        },
    ]
}
