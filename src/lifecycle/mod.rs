//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every ShutdownListener (watcher, load generators) leaves its loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → caller triggers shutdown
//! ```
//!
//! # Design Decisions
//! - One watch channel per owner; a trigger is never missed by a late listener
//! - Background loops select on shutdown next to their timer

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownListener};
pub use signals::wait_for_signal;
