//! Append-only event log
//!
//! The whole log lives under one store key as a JSON array, oldest first.
//! Every append reads the array, pushes one event and writes the array
//! back.
//!
//! Appends through one `EventLog` are serialized by an internal lock.
//! Two logs over the same store (two processes, two handles) still race:
//! their read-modify-write cycles can interleave and the last writer wins.

use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::events::error::{EventError, EventResult};
use crate::events::store::EventStore;
use crate::events::types::{seed_events, Event};

/// Store key holding the serialized log
pub const DEFAULT_EVENT_KEY: &str = "eventMessages";

/// Append-only, store-backed list of events
pub struct EventLog {
    store: Arc<dyn EventStore>,
    key: String,
    append_lock: Mutex<()>,
}

impl EventLog {
    /// Create a log over `store` using the default key
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self::with_key(store, DEFAULT_EVENT_KEY)
    }

    /// Create a log over `store` under a custom key
    pub fn with_key(store: Arc<dyn EventStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Store key this log reads and writes
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backend name of the underlying store
    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    /// Record `message` as a new event
    ///
    /// Never fails: store and payload errors are logged and the stored log
    /// is left as it was. Returns the event when it was persisted.
    pub async fn append(&self, message: impl Into<String>) -> Option<Event> {
        match self.try_append(message).await {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    backend = self.store.name(),
                    error = %e,
                    "Failed to append event"
                );
                None
            }
        }
    }

    /// Record `message` as a new event, returning any failure
    ///
    /// A corrupt payload is reported as `EventError::Corrupt` and is not
    /// overwritten.
    pub async fn try_append(&self, message: impl Into<String>) -> EventResult<Event> {
        let _guard = self.append_lock.lock().await;

        let mut events = match self.store.get(&self.key).await? {
            Some(raw) if !raw.trim().is_empty() => parse_events(&raw)?,
            _ => Vec::new(),
        };

        // Keep timestamps non-decreasing even if the clock steps back
        let mut timestamp = Utc::now().trunc_subsecs(3);
        if let Some(last) = events.last() {
            if last.timestamp > timestamp {
                timestamp = last.timestamp;
            }
        }

        let event = Event::with_timestamp(message, timestamp);
        events.push(event.clone());

        let payload = serde_json::to_string(&events)?;
        self.store.set(&self.key, &payload).await?;

        tracing::debug!(id = %event.id, total = events.len(), "Appended event");
        Ok(event)
    }

    /// Every event in insertion order
    ///
    /// Seeds the log on first use. Unreadable or corrupt logs read as
    /// empty; the failure is logged.
    pub async fn read_all(&self) -> Vec<Event> {
        match self.try_read_all().await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    backend = self.store.name(),
                    error = %e,
                    "Failed to read event log"
                );
                Vec::new()
            }
        }
    }

    /// Every event in insertion order, returning read and parse failures
    ///
    /// When no log exists the seed events are persisted and returned. A
    /// failure to persist the seeds is logged but does not hide them.
    pub async fn try_read_all(&self) -> EventResult<Vec<Event>> {
        // Held so seeding cannot overwrite a concurrent append
        let _guard = self.append_lock.lock().await;

        match self.store.get(&self.key).await? {
            Some(raw) if !raw.trim().is_empty() => parse_events(&raw),
            _ => {
                let seeds = seed_events();
                let payload = serde_json::to_string(&seeds)?;
                match self.store.set(&self.key, &payload).await {
                    Ok(()) => tracing::info!(key = %self.key, "Seeded event log"),
                    Err(e) => tracing::warn!(
                        key = %self.key,
                        error = %e,
                        "Failed to persist seed events"
                    ),
                }
                Ok(seeds)
            }
        }
    }
}

fn parse_events(raw: &str) -> EventResult<Vec<Event>> {
    serde_json::from_str(raw).map_err(|e| EventError::Corrupt(e.to_string()))
}
