//! Normalization - reconcile legacy backup shapes before validation
//!
//! Never fails: anything it cannot make sense of is passed through for the
//! validator to reject, except legacy session entries, which are dropped.

use serde_json::{Map, Value};
use tracing::debug;

/// Legacy snake_case body measurement columns and their canonical names
const MEASUREMENT_ALIASES: &[(&str, &str)] = &[
    ("body_fat", "bodyFat"),
    ("muscle_mass", "muscleMass"),
    ("water_percentage", "waterPercentage"),
    ("visceral_fat", "visceralFat"),
    ("bone_mass", "boneMass"),
    ("metabolic_age", "metabolicAge"),
    ("protein_percentage", "proteinPercentage"),
];

/// Why a session entry was left out of the sessions mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// `data` string is not JSON, or not a JSON object
    InvalidData,
    /// Neither the parsed session nor the wrapper carries a usable id
    MissingId,
    /// Neither the raw nor the already-parsed shape
    UnknownShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedSession {
    pub index: usize,
    pub reason: DropReason,
}

/// What normalization had to throw away
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub dropped_sessions: Vec<DroppedSession>,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_sessions.is_empty()
    }
}

pub fn normalize(input: Value) -> Value {
    normalize_with_report(input).0
}

/// Normalize a parsed document, reporting dropped session entries
pub fn normalize_with_report(input: Value) -> (Value, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let mut root = match input {
        Value::Object(root) => root,
        other => return (other, report),
    };

    if !is_present(&root, "exportDate") {
        if let Some(date) = root.get("date").cloned() {
            root.insert("exportDate".to_string(), date);
        }
    }

    if !is_present(&root, "workoutHistory") {
        let history = root
            .get("workouts")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        root.insert("workoutHistory".to_string(), history);
    }

    for key in ["exercises", "sets"] {
        if !is_present(&root, key) {
            root.insert(key.to_string(), Value::Array(Vec::new()));
        }
    }

    if let Some(Value::Array(entries)) = root.get_mut("sessions") {
        let entries = std::mem::take(entries);
        let sessions = sessions_to_map(entries, &mut report);
        root.insert("sessions".to_string(), Value::Object(sessions));
    }

    if let Some(Value::Array(measurements)) = root.get_mut("bodyMeasurements") {
        for measurement in measurements.iter_mut() {
            if let Value::Object(fields) = measurement {
                alias_measurement_fields(fields);
            }
        }
    }

    (Value::Object(root), report)
}

fn is_present(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(|v| !v.is_null())
}

/// Session ids may be stored as numbers by the raw DB export
fn key_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn sessions_to_map(entries: Vec<Value>, report: &mut NormalizeReport) -> Map<String, Value> {
    let mut sessions = Map::new();

    for (index, entry) in entries.into_iter().enumerate() {
        match session_entry(entry) {
            Ok((key, session)) => {
                sessions.insert(key, session);
            }
            Err(reason) => {
                debug!(index, ?reason, "dropping session entry");
                report.dropped_sessions.push(DroppedSession { index, reason });
            }
        }
    }

    sessions
}

fn session_entry(entry: Value) -> Result<(String, Value), DropReason> {
    let Value::Object(wrapper) = entry else {
        return Err(DropReason::UnknownShape);
    };

    // Raw DB row: the session is JSON-encoded in `data`
    if let Some(Value::String(data)) = wrapper.get("data") {
        let parsed: Value = serde_json::from_str(data).map_err(|_| DropReason::InvalidData)?;
        if !parsed.is_object() {
            return Err(DropReason::InvalidData);
        }
        let key = key_of(parsed.get("id"))
            .or_else(|| key_of(wrapper.get("id")))
            .ok_or(DropReason::MissingId)?;
        return Ok((key, parsed));
    }

    let already_parsed = ["id", "name", "sections"]
        .iter()
        .all(|k| is_present(&wrapper, k));
    if already_parsed {
        let key = key_of(wrapper.get("id")).ok_or(DropReason::MissingId)?;
        return Ok((key, Value::Object(wrapper)));
    }

    Err(DropReason::UnknownShape)
}

fn alias_measurement_fields(fields: &mut Map<String, Value>) {
    for (legacy, canonical) in MEASUREMENT_ALIASES {
        if is_present(fields, canonical) {
            continue;
        }
        if let Some(value) = fields.get(*legacy).cloned() {
            fields.insert(canonical.to_string(), value);
        }
    }
}
