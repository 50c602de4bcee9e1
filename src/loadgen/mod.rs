//! Load generation against a litess worker.
//!
//! # Data Flow
//! ```text
//! Monkey (one per simulated user)
//!     → Manager::get() snapshot: enabled? capacity?
//!     → StateStore "car_count": room for another car?
//!     → entities.rs builds cars/wheels and their SQL
//!     → client.rs POSTs {"sql": ...} to /exec or /query
//!     → query results written back to "car_count"
//! ```
//!
//! # Design Decisions
//! - Every iteration takes a fresh snapshot; settings changes apply on the
//!   next iteration without restarting anything
//! - Worker failures are logged and counted, never retried

pub mod client;
pub mod entities;
pub mod monkey;

pub use client::{ClientError, WorkerClient, WorkerResponse};
pub use entities::{Car, Wheel};
pub use monkey::{Monkey, Step, CAR_COUNT_KEY};
