//! Settings validation.
//!
//! # Responsibilities
//! - Decide whether a decoded JSON value is acceptable settings
//! - Turn acceptable values into typed `Settings`
//!
//! # Design Decisions
//! - Validation is the typed decode: a wrong type and malformed input share one
//!   error path
//! - Never panics on arbitrary input

use serde_json::Value;
use thiserror::Error;

use crate::settings::schema::Settings;

/// Why a candidate was refused.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Raw bytes were not JSON at all.
    #[error("settings are not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The top-level value was not an object.
    #[error("settings must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A known key had the wrong type.
    #[error("settings failed schema validation: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Result type for settings decoding.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Decode a candidate value into typed settings.
pub fn decode(candidate: Value) -> SettingsResult<Settings> {
    if !candidate.is_object() {
        return Err(SettingsError::NotAnObject(kind_of(&candidate)));
    }
    serde_json::from_value(candidate).map_err(SettingsError::Schema)
}

/// Returns true when `candidate` would be accepted by the registry.
pub fn validate(candidate: &Value) -> bool {
    let Some(object) = candidate.as_object() else {
        return false;
    };

    let enabled_ok = matches!(object.get("enabled"), None | Some(Value::Null | Value::Bool(_)));
    let capacity_ok = match object.get("capacity") {
        None | Some(Value::Null) => true,
        Some(Value::Number(n)) => n.is_u64(),
        Some(_) => false,
    };

    enabled_ok && capacity_ok
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
