//! Operator notifications
//!
//! Transient messages produced by dashboard actions. Success messages are
//! only produced after the fleet service accepted the request.

use serde::Serialize;

use crate::fleet::{DroneState, FleetError, Transition, WeightClass};

/// How long transition notifications stay visible
pub const TRANSITION_NOTICE_MS: u64 = 5_000;

/// How long the registration notification stays visible
pub const REGISTER_NOTICE_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message for the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub duration_ms: u64,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
            duration_ms,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            description: description.into(),
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// Button label for a drone in `state`
pub fn action_label(state: &DroneState) -> &'static str {
    match Transition::for_state(state) {
        Some(transition) => transition_label(transition),
        None => "Update State",
    }
}

pub fn transition_label(transition: Transition) -> &'static str {
    match transition {
        Transition::SetForDelivery => "Send for Delivery",
        Transition::Deliver => "Deliver",
        Transition::ReturnDrone => "Mark for return",
        Transition::MarkIdle => "Mark IDLE",
    }
}

pub(crate) fn transition_success(transition: Transition, serial_number: &str) -> Notification {
    let (title, description) = match transition {
        Transition::SetForDelivery => (
            "Drone sent for delivery.",
            format!("Drone {} ready for delivery", serial_number),
        ),
        Transition::Deliver => (
            "Drone out to recipient.",
            format!("Drone {} was sent for delivery.", serial_number),
        ),
        Transition::ReturnDrone => (
            "Drone returning to base.",
            format!("Drone {} marked for return", serial_number),
        ),
        Transition::MarkIdle => (
            "Drone marked as idle",
            format!(
                "Drone {} has returned from delivery and is idle",
                serial_number
            ),
        ),
    };
    Notification::success(title, description, TRANSITION_NOTICE_MS)
}

pub(crate) fn transition_failure(
    transition: Transition,
    serial_number: &str,
    error: &FleetError,
) -> Notification {
    Notification::error(
        format!("{} failed", transition_label(transition)),
        format!("Drone {}: {}", serial_number, error.user_message()),
        TRANSITION_NOTICE_MS,
    )
}

pub(crate) fn register_success(weight_class: WeightClass) -> Notification {
    Notification::success(
        "Drone Registered",
        format!("New {} drone registered.", weight_class),
        REGISTER_NOTICE_MS,
    )
}

pub(crate) fn register_failure(weight_class: WeightClass, error: &FleetError) -> Notification {
    Notification::error(
        "Drone registration failed",
        format!("{} drone: {}", weight_class, error.user_message()),
        REGISTER_NOTICE_MS,
    )
}

pub(crate) fn load_success(medication: &str, serial_number: &str) -> Notification {
    Notification::success(
        "Medication loaded",
        format!("{} loaded on drone {}", medication, serial_number),
        TRANSITION_NOTICE_MS,
    )
}

pub(crate) fn load_failure(serial_number: &str, error: &FleetError) -> Notification {
    let title = match error.code() {
        Some("DRONE_WEIGHT_LIMIT") => "Weight limit exceeded",
        Some("DRONE_NOT_FOUND") => "Drone not found",
        Some("MEDICATION_NOT_FOUND") => "Medication not found",
        _ => "Could not load medication",
    };
    Notification::error(
        title,
        format!("Drone {}: {}", serial_number, error.user_message()),
        TRANSITION_NOTICE_MS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_labels() {
        assert_eq!(action_label(&DroneState::Loaded), "Send for Delivery");
        assert_eq!(action_label(&DroneState::Delivering), "Deliver");
        assert_eq!(action_label(&DroneState::Delivered), "Mark for return");
        assert_eq!(action_label(&DroneState::Returning), "Mark IDLE");
        assert_eq!(action_label(&DroneState::Idle), "Update State");
    }

    #[test]
    fn test_transition_texts() {
        let n = transition_success(Transition::SetForDelivery, "d-7");
        assert_eq!(n.title, "Drone sent for delivery.");
        assert_eq!(n.description, "Drone d-7 ready for delivery");
        assert_eq!(n.duration_ms, 5_000);
        assert!(n.is_success());
    }

    #[test]
    fn test_load_failure_titles() {
        let err = FleetError::Api {
            status: 400,
            code: Some("DRONE_WEIGHT_LIMIT".to_string()),
            message: "too heavy".to_string(),
        };
        let n = load_failure("d-1", &err);
        assert_eq!(n.title, "Weight limit exceeded");
        assert_eq!(n.description, "Drone d-1: too heavy");
        assert_eq!(n.kind, NotificationKind::Error);
    }

    #[test]
    fn test_notification_json() {
        let n = register_success(WeightClass::LightWeight);
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["description"], "New LIGHT_WEIGHT drone registered.");
        assert_eq!(json["duration_ms"], 2000);
    }
}
