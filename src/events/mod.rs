//! DroneDesk Event Log
//!
//! A locally persisted, append-only record of notable occurrences: fleet
//! fetches that succeeded or failed, operator actions.
//!
//! - **types**: `Event` and the seed events
//! - **store**: `EventStore` contract plus memory and file backends
//! - **sqlite**: SQLite backend
//! - **log**: `EventLog`, the append/read operations
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use dronedesk::events::{EventLog, FileStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileStore::open("./dronedesk_data")?);
//!     let log = EventLog::new(store);
//!
//!     log.append("Drone Alpha loaded successfully").await;
//!
//!     for event in log.read_all().await {
//!         println!("{} {}", event.display_time(), event.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod log;
pub mod sqlite;
pub mod store;
pub mod types;

pub use error::{EventError, EventResult, StoreError, StoreResult};
pub use log::{EventLog, DEFAULT_EVENT_KEY};
pub use sqlite::SqliteStore;
pub use store::{validate_key, EventStore, FileStore, MemoryStore};
pub use types::{seed_events, Event};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Which `EventStore` implementation backs the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory, lost on exit
    Memory,
    /// JSON file per key
    #[default]
    File,
    /// SQLite database
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(format!(
                "unknown event backend '{}' (expected memory, file or sqlite)",
                other
            )),
        }
    }
}

/// Open the configured store
pub fn open_store(
    backend: StoreBackend,
    data_dir: &Path,
    quota_bytes: Option<usize>,
) -> StoreResult<Arc<dyn EventStore>> {
    let store: Arc<dyn EventStore> = match backend {
        StoreBackend::Memory => match quota_bytes {
            Some(limit) => Arc::new(MemoryStore::with_quota(limit)),
            None => Arc::new(MemoryStore::new()),
        },
        StoreBackend::File => Arc::new(FileStore::open(data_dir)?),
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(data_dir)?),
    };

    tracing::debug!("Opened {} event store at {:?}", store.name(), data_dir);
    Ok(store)
}
