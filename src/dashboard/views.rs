//! View state for the dashboard pages

use serde::{Deserialize, Serialize};

use crate::dashboard::notification::action_label;
use crate::events::Event;
use crate::fleet::{Drone, DroneListing, Transition};

/// Drone list pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DroneView {
    All,
    Loaded,
    ForDelivery,
    Delivered,
    Returning,
    Idle,
}

impl DroneView {
    /// Sections of the home page, in display order
    pub const HOME: [DroneView; 4] = [
        DroneView::Loaded,
        DroneView::ForDelivery,
        DroneView::Delivered,
        DroneView::Returning,
    ];

    pub fn listing(&self) -> DroneListing {
        match self {
            DroneView::All => DroneListing::All,
            DroneView::Loaded => DroneListing::Loaded,
            DroneView::ForDelivery => DroneListing::ForDelivery,
            DroneView::Delivered => DroneListing::Delivered,
            DroneView::Returning => DroneListing::Returning,
            DroneView::Idle => DroneListing::Available,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DroneView::All => "All Drones",
            DroneView::Loaded => "Loaded Drones",
            DroneView::ForDelivery => "Ready for Delivery",
            DroneView::Delivered => "Out for Delivery",
            DroneView::Returning => "Returning Drones",
            DroneView::Idle => "Idle (available drones)",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            DroneView::All | DroneView::Idle => "No drones available",
            DroneView::Loaded => "No loaded drones.",
            DroneView::ForDelivery => "No drones ready for delivery.",
            DroneView::Delivered => "No delivered drones.",
            DroneView::Returning => "No returning drones.",
        }
    }
}

impl std::str::FromStr for DroneView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "all" => Ok(DroneView::All),
            "loaded" => Ok(DroneView::Loaded),
            "for-delivery" | "fordelivery" => Ok(DroneView::ForDelivery),
            "delivered" => Ok(DroneView::Delivered),
            "returning" => Ok(DroneView::Returning),
            "idle" | "available" => Ok(DroneView::Idle),
            other => Err(format!(
                "unknown view '{}' (expected all, loaded, for-delivery, delivered, returning or idle)",
                other
            )),
        }
    }
}

/// A titled list with its empty-state message
#[derive(Debug, Clone, Serialize)]
pub struct ListView<T> {
    pub title: String,
    pub items: Vec<T>,
    pub empty_message: String,
    /// Set when the fetch failed and `items` is the empty fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ListView<T> {
    pub fn loaded(title: impl Into<String>, empty_message: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            title: title.into(),
            items,
            empty_message: empty_message.into(),
            error: None,
        }
    }

    pub fn failed(
        title: impl Into<String>,
        empty_message: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            empty_message: empty_message.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A drone plus the action the dashboard offers for it
#[derive(Debug, Clone, Serialize)]
pub struct DroneCard {
    #[serde(flatten)]
    pub drone: Drone,
    /// Button label, absent when no transition applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
}

impl From<Drone> for DroneCard {
    fn from(drone: Drone) -> Self {
        let action = Transition::for_state(&drone.state).map(|_| action_label(&drone.state));
        Self { drone, action }
    }
}

/// The home page: one section per delivery stage
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub title: String,
    pub sections: Vec<ListView<DroneCard>>,
}

/// Title of the events page
pub const EVENTS_TITLE: &str = "Event Messages";

/// Shown when the log has no events
pub const EVENTS_EMPTY: &str = "No event messages. Make something happen!";

/// The event log page
#[derive(Debug, Clone, Serialize)]
pub struct EventsView {
    pub title: String,
    pub events: Vec<Event>,
    pub empty_message: String,
}

impl EventsView {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            title: EVENTS_TITLE.to_string(),
            events,
            empty_message: EVENTS_EMPTY.to_string(),
        }
    }
}
