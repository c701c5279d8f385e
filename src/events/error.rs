//! Event log error types
//!
//! Errors raised by event store backends and by the event log itself.
//! The log's infallible entry points report these through `tracing`
//! instead of returning them.

use thiserror::Error;

/// Errors that can occur in an event store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite backend failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Backend refused the write because it is full
    #[error("Store quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Backend cannot be reached at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Invalid storage key
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Errors that can occur while reading or appending to the event log
#[derive(Error, Debug)]
pub enum EventError {
    /// The underlying store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The persisted payload is not a valid event sequence
    #[error("Corrupt event log: {0}")]
    Corrupt(String),

    /// Serializing the event sequence failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for event log operations
pub type EventResult<T> = Result<T, EventError>;
