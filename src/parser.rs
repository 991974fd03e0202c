//! JSON parser for MBTA V3 prediction responses.
//!
//! Turns the `{"data": [{"attributes": {...}}]}` envelope into whole minutes
//! until each vehicle reaches the stop.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::TimeField;

/// Top-level JSON:API document returned by `/predictions`.
///
/// Entries stay as raw JSON so one badly typed entry is skipped on its own
/// instead of failing the whole document.
#[derive(Debug, Deserialize)]
pub struct PredictionEnvelope {
    pub data: Vec<Value>,
}

/// One prediction resource. Only the attributes are read.
#[derive(Debug, Deserialize)]
pub struct PredictionResource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Option<PredictionAttributes>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictionAttributes {
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
}

impl PredictionAttributes {
    /// The preferred timestamp, falling back to the other field when null or blank.
    pub fn time(&self, field: TimeField) -> Option<&str> {
        let (preferred, fallback) = match field {
            TimeField::Arrival => (&self.arrival_time, &self.departure_time),
            TimeField::Departure => (&self.departure_time, &self.arrival_time),
        };
        non_blank(preferred).or_else(|| non_blank(fallback))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Decodes a prediction response body.
///
/// # Errors
///
/// Returns an error if the body is not JSON or has no `data` array.
pub fn parse_envelope(bytes: &[u8]) -> Result<PredictionEnvelope> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Whole minutes from `now` until an ISO-8601 timestamp such as
/// `2024-01-01T10:05:00-05:00`, rounded to the nearest minute with ties
/// going to the even minute.
///
/// Negative results mean the vehicle has already gone.
pub fn minutes_until(timestamp: &str, now: DateTime<Utc>) -> Result<i64> {
    let at = DateTime::parse_from_rfc3339(timestamp)
        .with_context(|| format!("unparsable timestamp '{timestamp}'"))?;
    let delta = at.with_timezone(&Utc) - now;
    let minutes = delta.num_milliseconds() as f64 / 60_000.0;

    Ok(minutes.round_ties_even() as i64)
}

/// Minutes until each upcoming vehicle, in the order the API listed them.
///
/// Entries that are not prediction objects, entries without attributes or a
/// timestamp, entries whose timestamp does not parse, and vehicles that have
/// already left are skipped.
pub fn extract_minutes(envelope: &PredictionEnvelope, field: TimeField, now: DateTime<Utc>) -> Vec<u32> {
    let mut minutes = Vec::with_capacity(envelope.data.len());

    for (index, entry) in envelope.data.iter().enumerate() {
        let id = entry.get("id").and_then(Value::as_str).unwrap_or("<none>");

        let resource = match PredictionResource::deserialize(entry) {
            Ok(resource) => resource,
            Err(e) => {
                warn!(index, id, error = %e, "Skipping malformed prediction entry");
                continue;
            }
        };

        let Some(attributes) = &resource.attributes else {
            warn!(index, id, "Prediction has no attributes, skipping");
            continue;
        };

        let Some(timestamp) = attributes.time(field) else {
            debug!(index, id, "Prediction has no time, skipping");
            continue;
        };

        match minutes_until(timestamp, now) {
            Ok(m) if m < 0 => debug!(index, id, minutes = m, "Vehicle already departed"),
            Ok(m) => minutes.push(m as u32),
            Err(e) => warn!(index, id, error = %e, "Skipping prediction with bad timestamp"),
        }
    }

    minutes
}
