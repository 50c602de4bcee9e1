//! Shared counter store.
//!
//! # Data Flow
//! ```text
//! load generator task A ── set("car_count", 42) ──┐
//!                                                  ├─▶ StateStore (DashMap)
//! load generator task B ── get("car_count") ──────┘
//! ```
//!
//! # Design Decisions
//! - Values are untyped JSON; producers and consumers agree on key names
//! - Locking is independent of the settings registry
//! - Entries live until removed explicitly

pub mod store;

pub use store::{StateError, StateStore};
