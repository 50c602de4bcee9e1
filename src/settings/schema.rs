//! Settings schema definitions.
//!
//! The watched file is a JSON object. Only `enabled` and `capacity` carry
//! meaning here; any other key is carried along in `extra` untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::settings::fingerprint::Fingerprint;

/// Load generation settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Whether generation runs at all. `None` means enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Upper bound on generated rows. `None` means unbounded.
    #[serde(default)]
    pub capacity: Option<u64>,

    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Settings {
    /// Absent and null both count as enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Whether `count` existing rows still leave room for one more.
    pub fn has_room_for(&self, count: u64) -> bool {
        match self.capacity {
            Some(capacity) => count < capacity,
            None => true,
        }
    }
}

/// An owned copy of the registry contents at the moment of a read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub settings: Settings,

    /// Fingerprint of the file the settings came from. `None` until the first
    /// successful load.
    pub fingerprint: Option<Fingerprint>,

    /// Number of updates committed before this read.
    pub revision: u64,
}
