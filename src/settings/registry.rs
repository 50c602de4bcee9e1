//! The settings registry.
//!
//! Holds the current settings and the fingerprint they were loaded from. Both
//! are replaced together under one write lock, so a reader can never pair a
//! settings value with another update's fingerprint.

use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::observability::metrics;
use crate::settings::fingerprint::Fingerprint;
use crate::settings::schema::{Settings, Snapshot};
use crate::settings::validation::{decode, SettingsError};

/// Thread-safe holder of the current settings.
#[derive(Debug, Default)]
pub struct SettingsRegistry {
    current: RwLock<Snapshot>,
}

impl SettingsRegistry {
    /// Create an empty registry: default settings, no fingerprint, revision 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `candidate` and, if it passes, make it the current settings.
    ///
    /// On failure the held settings and fingerprint are left untouched.
    pub fn update(&self, candidate: Value, fingerprint: Fingerprint) -> Result<(), SettingsError> {
        match decode(candidate) {
            Ok(settings) => {
                self.publish(settings, fingerprint);
                Ok(())
            }
            Err(e) => {
                tracing::error!(fingerprint = %fingerprint, error = %e, "Invalid settings object");
                metrics::record_settings_rejected();
                Err(e)
            }
        }
    }

    /// Replace the current settings with already-validated ones.
    pub fn publish(&self, settings: Settings, fingerprint: Fingerprint) {
        let (enabled, capacity) = (settings.enabled, settings.capacity);
        let stored = Some(fingerprint.clone());

        let revision = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            current.revision += 1;
            current.settings = settings;
            current.fingerprint = stored;
            current.revision
        };

        tracing::info!(
            fingerprint = %fingerprint,
            revision,
            ?enabled,
            ?capacity,
            "Settings updated"
        );
        metrics::record_settings_revision(revision);
    }

    /// Take an owned copy of the current settings and fingerprint.
    pub fn read(&self) -> Snapshot {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of committed updates so far.
    pub fn revision(&self) -> u64 {
        self.current.read().unwrap_or_else(PoisonError::into_inner).revision
    }
}
