//! Wire types exchanged with the telemetry source and the settings store

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Per-quantity warning flags, classified upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warnings {
    pub temperature: bool,
    pub heart_rate: bool,
    pub gforce: bool,
}

/// One snapshot of sensor values as returned by `/api/sensor-data`.
///
/// Unknown fields such as `gyroscope` or `timestamp` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temperature: f64,
    #[serde(deserialize_with = "integer_or_whole_float")]
    pub heart_rate: i64,
    pub gforce: f64,
    pub warnings: Warnings,
}

/// Thresholds as held by the settings store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ThresholdSettings {
    pub temperature_threshold: f64,
    #[serde(deserialize_with = "integer_or_whole_float")]
    pub heart_rate_threshold: i64,
    pub gforce_threshold: f64,
}

/// Body of a `POST /api/settings`.
///
/// A field that could not be coerced to a number is sent as `null`; the store
/// is responsible for rejecting it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ThresholdSubmission {
    pub temperature_threshold: Option<f64>,
    pub heart_rate_threshold: Option<i64>,
    pub gforce_threshold: Option<f64>,
}

/// Error body returned by the store on rejection
#[derive(Debug, Deserialize)]
pub(crate) struct StoreError {
    pub error: String,
}

/// Accepts `80` as well as `80.0`; some sensor backends emit rounded floats.
fn integer_or_whole_float<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    match number.as_f64() {
        Some(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(D::Error::custom(format!("expected an integer, got {}", number))),
    }
}
