//! Snapshot flattening
//!
//! A snapshot of `hospitals` is a two-level mapping:
//!
//! ```text
//! { "2024": { "-Nq1...": { "name": "A" }, "-Nq2...": { ... } },
//!   "2025": { ... } }
//! ```
//!
//! Flattening turns it into one [`Hospital`] per (year, id) pair, each
//! annotated with its id and year.

use crate::domain::{Hospital, HospitalId, Year};
use serde_json::Value;

/// Flatten a `hospitals` snapshot into a list of hospitals
///
/// An absent (`null`) or empty snapshot yields an empty list. The id and
/// year taken from the record's location override same-named fields stored
/// in the record. Year partitions and records that are not JSON objects, or
/// whose keys are not valid identifiers, are skipped with a warning.
///
/// The order of the result is unspecified; sort if an order is needed.
///
/// # Examples
///
/// ```
/// use hospital_sync::core::transform::flatten_snapshot;
/// use serde_json::json;
///
/// let hospitals = flatten_snapshot(&json!({
///     "2024": {"x": {"name": "A"}, "y": {"name": "B"}},
///     "2025": {"z": {"name": "C"}}
/// }));
/// assert_eq!(hospitals.len(), 3);
/// assert!(flatten_snapshot(&serde_json::Value::Null).is_empty());
/// ```
pub fn flatten_snapshot(snapshot: &Value) -> Vec<Hospital> {
    let partitions = match snapshot {
        Value::Null => return Vec::new(),
        Value::Object(partitions) => partitions,
        other => {
            tracing::warn!(kind = value_kind(other), "Ignoring non-object hospitals snapshot");
            return Vec::new();
        }
    };

    let mut hospitals = Vec::new();
    for (year_key, records) in partitions {
        let Ok(year) = Year::new(year_key.as_str()) else {
            tracing::warn!(year = %year_key, "Skipping partition with invalid year key");
            continue;
        };
        let Value::Object(records) = records else {
            tracing::warn!(year = %year, kind = value_kind(records), "Skipping non-object year partition");
            continue;
        };

        for (id_key, record) in records {
            let Ok(id) = HospitalId::new(id_key.as_str()) else {
                tracing::warn!(year = %year, id = %id_key, "Skipping record with invalid id");
                continue;
            };
            let Value::Object(fields) = record else {
                tracing::warn!(year = %year, id = %id, kind = value_kind(record), "Skipping non-object record");
                continue;
            };

            hospitals.push(Hospital::new(id, year.clone(), fields.clone()));
        }
    }

    hospitals
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
