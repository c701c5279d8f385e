//! DroneDesk Dashboard
//!
//! The pages and buttons of the operator dashboard as async operations.
//! Every page load and every action leaves a line in the event log; fetch
//! failures turn into empty views instead of errors.
//!
//! - **views**: view state types (`ListView`, `HomeView`, `EventsView`)
//! - **form**: the load-medication form and its input rules
//! - **notification**: operator notifications and button labels
//! - **timer**: one-shot delayed follow-ups

pub mod form;
pub mod notification;
pub mod timer;
pub mod views;

pub use form::{FormError, MedicationForm, DEFAULT_IMG_URL};
pub use notification::{action_label, Notification, NotificationKind};
pub use timer::FollowUp;
pub use views::{DroneCard, DroneView, EventsView, HomeView, ListView};

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::events::{Event, EventLog};
use crate::fleet::{Drone, DroneState, FleetApi, FleetResult, Medication, Transition, WeightClass};

/// Delay before showing idle drones after a registration
pub const DEFAULT_FOLLOW_UP_DELAY: Duration = Duration::from_secs(3);

/// Result of a registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterOutcome {
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drone: Option<Drone>,
}

/// A drone with its battery reading and loaded medications
#[derive(Debug, Clone, Serialize)]
pub struct DroneDetail {
    #[serde(flatten)]
    pub card: DroneCard,
    pub battery_level: u32,
    pub medications: Vec<Medication>,
}

/// Dashboard operations over a fleet service and an event log
pub struct Dashboard {
    fleet: Arc<dyn FleetApi>,
    events: Arc<EventLog>,
    follow_up_delay: Duration,
}

impl Dashboard {
    pub fn new(fleet: Arc<dyn FleetApi>, events: Arc<EventLog>) -> Self {
        Self {
            fleet,
            events,
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY,
        }
    }

    /// Override the delay used by `follow_up_idle`
    pub fn with_follow_up_delay(mut self, delay: Duration) -> Self {
        self.follow_up_delay = delay;
        self
    }

    pub fn event_log(&self) -> &Arc<EventLog> {
        &self.events
    }

    pub fn follow_up_delay(&self) -> Duration {
        self.follow_up_delay
    }

    /// Load one drone list page
    pub async fn drones(&self, view: DroneView) -> ListView<DroneCard> {
        let list = self.load(view).await;
        if list.error.is_none() {
            let message = match view {
                DroneView::All => "Fetched all drones [LOADED, LOADING, IDLE, etc]".to_string(),
                _ => format!(
                    "Fetched {} ({})",
                    view.listing().describe(),
                    list.items.len()
                ),
            };
            self.events.append(message).await;
        }
        list
    }

    /// Load the four delivery-stage sections of the home page
    pub async fn home(&self) -> HomeView {
        let [loaded, for_delivery, delivered, returning] = DroneView::HOME;
        let (loaded, for_delivery, delivered, returning) = tokio::join!(
            self.load(loaded),
            self.load(for_delivery),
            self.load(delivered),
            self.load(returning),
        );
        let sections = vec![loaded, for_delivery, delivered, returning];

        let counts: Vec<String> = sections
            .iter()
            .filter(|s| s.error.is_none())
            .map(|s| format!("{} {}", s.items.len(), s.title.to_lowercase()))
            .collect();
        if !counts.is_empty() {
            self.events
                .append(format!("Refreshed dashboard: {}", counts.join(", ")))
                .await;
        }

        HomeView {
            title: "Drone Management Dashboard".to_string(),
            sections,
        }
    }

    /// Load the medications page
    pub async fn medications(&self) -> ListView<Medication> {
        const TITLE: &str = "All saved medications";
        const EMPTY: &str = "No medications available";

        match self.fleet.list_medications().await {
            Ok(meds) => {
                self.events
                    .append(format!("Fetched medications ({})", meds.len()))
                    .await;
                ListView::loaded(TITLE, EMPTY, meds)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching medications");
                self.events
                    .append(format!("Failed to fetch medications: {}", e))
                    .await;
                ListView::failed(TITLE, EMPTY, e.to_string())
            }
        }
    }

    /// Look up one medication
    pub async fn medication(&self, id: &str) -> FleetResult<Option<Medication>> {
        self.fleet.get_medication(id).await
    }

    /// Look up one drone
    pub async fn drone(&self, serial_number: &str) -> FleetResult<Option<Drone>> {
        self.fleet.get_drone(serial_number).await
    }

    /// Look up one drone with its battery level and loaded medications
    pub async fn drone_detail(&self, serial_number: &str) -> FleetResult<Option<DroneDetail>> {
        let Some(drone) = self.fleet.get_drone(serial_number).await? else {
            return Ok(None);
        };

        let (battery, medications) = tokio::join!(
            self.fleet.battery_level(serial_number),
            self.fleet.drone_medications(serial_number),
        );

        Ok(Some(DroneDetail {
            card: DroneCard::from(drone),
            battery_level: battery?,
            medications: medications?,
        }))
    }

    /// The event log page
    pub async fn events(&self) -> EventsView {
        EventsView::new(self.events.read_all().await)
    }

    /// Append an operator-supplied message to the event log
    pub async fn record(&self, message: impl Into<String>) -> Option<Event> {
        self.events.append(message).await
    }

    /// Press the action button of a drone in `state`
    ///
    /// Returns `None` when no action applies to that state; nothing is
    /// sent in that case.
    pub async fn advance(&self, serial_number: &str, state: &DroneState) -> Option<Notification> {
        let Some(transition) = Transition::for_state(state) else {
            tracing::debug!("No action for drone {} in state {}", serial_number, state);
            return None;
        };

        let notification = match self.fleet.advance(serial_number, transition).await {
            Ok(()) => {
                let n = notification::transition_success(transition, serial_number);
                self.events.append(n.description.clone()).await;
                n
            }
            Err(e) => {
                tracing::error!(
                    serial_number,
                    transition = transition.path(),
                    error = %e,
                    "Drone transition failed"
                );
                self.events
                    .append(format!(
                        "Failed to {} drone {}: {}",
                        notification::transition_label(transition).to_lowercase(),
                        serial_number,
                        e
                    ))
                    .await;
                notification::transition_failure(transition, serial_number, &e)
            }
        };

        Some(notification)
    }

    /// Register a drone of `weight_class`
    pub async fn register(&self, weight_class: WeightClass) -> RegisterOutcome {
        match self.fleet.register_drone(weight_class).await {
            Ok(drone) => {
                let message = match &drone {
                    Some(d) => format!("Registered {} drone {}", weight_class, d.serial_number),
                    None => format!("Registered {} drone", weight_class),
                };
                self.events.append(message).await;
                RegisterOutcome {
                    notification: notification::register_success(weight_class),
                    drone,
                }
            }
            Err(e) => {
                tracing::error!(%weight_class, error = %e, "Drone registration failed");
                self.events
                    .append(format!("Failed to register {} drone: {}", weight_class, e))
                    .await;
                RegisterOutcome {
                    notification: notification::register_failure(weight_class, &e),
                    drone: None,
                }
            }
        }
    }

    /// Load `medication` onto a drone
    pub async fn load_medication(&self, serial_number: &str, medication: &Medication) -> Notification {
        match self.fleet.load_medication(serial_number, medication).await {
            Ok(()) => {
                self.events
                    .append(format!(
                        "Loaded {} ({}) onto drone {}",
                        medication.name, medication.code, serial_number
                    ))
                    .await;
                notification::load_success(&medication.name, serial_number)
            }
            Err(e) => {
                tracing::error!(serial_number, error = %e, "Loading medication failed");
                self.events
                    .append(format!(
                        "Failed to load {} onto drone {}: {}",
                        medication.name, serial_number, e
                    ))
                    .await;
                notification::load_failure(serial_number, &e)
            }
        }
    }

    /// Show the idle drones once, after the follow-up delay
    pub fn follow_up_idle(self: &Arc<Self>) -> FollowUp<ListView<DroneCard>> {
        let dashboard = Arc::clone(self);
        FollowUp::schedule(self.follow_up_delay, async move {
            dashboard.drones(DroneView::Idle).await
        })
    }

    async fn load(&self, view: DroneView) -> ListView<DroneCard> {
        match self.fleet.list_drones(view.listing()).await {
            Ok(drones) => ListView::loaded(
                view.title(),
                view.empty_message(),
                drones.into_iter().map(DroneCard::from).collect(),
            ),
            Err(e) => {
                tracing::error!(view = ?view, error = %e, "Error fetching drones");
                self.events
                    .append(format!(
                        "Failed to fetch {}: {}",
                        view.listing().describe(),
                        e
                    ))
                    .await;
                ListView::failed(view.title(), view.empty_message(), e.to_string())
            }
        }
    }
}
