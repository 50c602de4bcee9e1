//! Metrics collection and exposition.
//!
//! # Metrics
//! - `settings_polls_total` (counter): watcher cycles by outcome
//! - `settings_rejected_total` (counter): candidates refused by validation
//! - `settings_revision` (gauge): committed settings updates
//! - `loadgen_requests_total` (counter): worker calls by kind and status
//! - `loadgen_car_count` (gauge): last car count observed by a query

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Serving metrics");
    Ok(())
}

pub fn record_settings_poll(outcome: &'static str) {
    ::metrics::counter!("settings_polls_total", "outcome" => outcome).increment(1);
}

pub fn record_settings_rejected() {
    ::metrics::counter!("settings_rejected_total").increment(1);
}

pub fn record_settings_revision(revision: u64) {
    ::metrics::gauge!("settings_revision").set(revision as f64);
}

pub fn record_request(kind: &'static str, status: &'static str) {
    ::metrics::counter!("loadgen_requests_total", "kind" => kind, "status" => status).increment(1);
}

pub fn record_car_count(count: u64) {
    ::metrics::gauge!("loadgen_car_count").set(count as f64);
}
