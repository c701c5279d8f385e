//! API Routes
//!
//! Route handlers organized by functionality.

pub mod drones;
pub mod events;
pub mod health;
pub mod medications;
