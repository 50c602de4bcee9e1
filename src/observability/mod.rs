//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! settings watcher, registry, load generators produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or --log-level)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Metric calls are no-ops until a recorder is installed, so library code
//!   records unconditionally
//! - Reload outcomes are labelled rather than split into separate metrics

pub mod logging;
pub mod metrics;
