//! Hot-reloaded settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings.json (JSON object)
//!     → watcher.rs (poll, compare raw bytes with last seen)
//!     → fingerprint.rs (SHA-256 of the raw bytes)
//!     → validation.rs (typed decode into Settings)
//!     → registry.rs (swap settings + fingerprint under one write lock)
//!     → consumers call read() and get an owned Snapshot
//!
//! manager.rs wires one registry, one state store and one watcher task
//! together and hands out Arc<Manager> (or the process-wide instance).
//! ```
//!
//! # Design Decisions
//! - Settings are plain values; every read clones them
//! - Invalid content never replaces the last known good settings
//! - Watcher failures are logged and absorbed, never surfaced to consumers

pub mod fingerprint;
pub mod manager;
pub mod registry;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use fingerprint::Fingerprint;
pub use manager::{get_instance, Manager, ManagerError, ManagerOptions};
pub use registry::SettingsRegistry;
pub use schema::{Settings, Snapshot};
pub use validation::{validate, SettingsError};
pub use watcher::{PollOutcome, SettingsWatcher};
