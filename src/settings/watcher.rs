//! Settings file watcher for hot reload.
//!
//! # Responsibilities
//! - Poll the settings file on a fixed interval
//! - Skip content identical to the last bytes seen
//! - Decode, fingerprint and push changed content into the registry
//!
//! # Design Decisions
//! - Fixed-interval polling, no filesystem event subscription
//! - The last seen bytes are remembered even when they fail to decode, so a
//!   broken file is reported once instead of every cycle
//! - File I/O and decoding finish before the registry lock is taken

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{self, MissedTickBehavior};

use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;
use crate::settings::fingerprint::Fingerprint;
use crate::settings::registry::SettingsRegistry;

/// Result of one watcher cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The file could not be read. Retried next cycle.
    Unreadable(io::ErrorKind),
    /// Same bytes as last time.
    Unchanged,
    /// New bytes that are not JSON.
    Malformed,
    /// New JSON that failed validation.
    Rejected,
    /// New settings committed to the registry.
    Applied(Fingerprint),
}

impl PollOutcome {
    /// Label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            PollOutcome::Unreadable(_) => "unreadable",
            PollOutcome::Unchanged => "unchanged",
            PollOutcome::Malformed => "malformed",
            PollOutcome::Rejected => "rejected",
            PollOutcome::Applied(_) => "applied",
        }
    }
}

/// Polls one settings file and feeds one registry.
pub struct SettingsWatcher {
    path: PathBuf,
    interval: Duration,
    registry: Arc<SettingsRegistry>,
    last_raw: Option<Vec<u8>>,
}

impl SettingsWatcher {
    /// Create a watcher for `path` that publishes into `registry`.
    pub fn new(path: &Path, interval: Duration, registry: Arc<SettingsRegistry>) -> Self {
        Self {
            path: path.to_path_buf(),
            interval,
            registry,
            last_raw: None,
        }
    }

    /// Run one cycle: read the file and process its contents.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let read = tokio::fs::read(&self.path).await;
        let outcome = self.observe(read);
        metrics::record_settings_poll(outcome.label());
        outcome
    }

    /// Process the result of reading the settings file.
    pub fn observe(&mut self, read: io::Result<Vec<u8>>) -> PollOutcome {
        let raw = match read {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::error!(path = ?self.path, "Settings file not found");
                return PollOutcome::Unreadable(e.kind());
            }
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Failed to read settings file");
                return PollOutcome::Unreadable(e.kind());
            }
        };

        if self.last_raw.as_deref() == Some(raw.as_slice()) {
            return PollOutcome::Unchanged;
        }

        let candidate = match serde_json::from_slice::<Value>(&raw) {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Invalid JSON in settings file");
                self.last_raw = Some(raw);
                return PollOutcome::Malformed;
            }
        };
        let fingerprint = Fingerprint::of(&raw);
        self.last_raw = Some(raw);

        match self.registry.update(candidate, fingerprint.clone()) {
            Ok(()) => PollOutcome::Applied(fingerprint),
            Err(_) => PollOutcome::Rejected,
        }
    }

    /// Poll until a shutdown signal arrives. The first poll happens immediately.
    pub async fn run(mut self, mut shutdown: ShutdownListener) {
        tracing::info!(
            path = ?self.path,
            interval_ms = self.interval.as_millis() as u64,
            "Settings watcher starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.poll_once().await;
                    tracing::trace!(outcome = outcome.label(), "Settings poll finished");
                }
                _ = shutdown.wait() => {
                    tracing::info!("Settings watcher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
