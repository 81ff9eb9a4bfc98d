//! Body measurement editing

use chrono::{DateTime, Utc};

use super::millis;
use crate::model::{BackupData, BodyMeasurement, Field};
use crate::store::BackupPatch;

/// Blank reading for today: weight 0, every composition field null
pub fn new_measurement(now: DateTime<Utc>) -> BodyMeasurement {
    let ms = millis(now);
    BodyMeasurement {
        id: format!("measurement-{ms}"),
        date: ms as f64,
        weight: 0.0,
        height: Field::Null,
        body_fat: Field::Null,
        muscle_mass: Field::Null,
        water_percentage: Field::Null,
        visceral_fat: Field::Null,
        bone_mass: Field::Null,
        bmr: Field::Null,
        metabolic_age: Field::Null,
        protein_percentage: Field::Null,
    }
}

/// Replace the reading with the same id, or append it
pub fn upsert_measurement(data: &BackupData, measurement: BodyMeasurement) -> BackupPatch {
    let mut measurements = data.body_measurements.clone().unwrap_or_default();
    match measurements.iter_mut().find(|m| m.id == measurement.id) {
        Some(existing) => *existing = measurement,
        None => measurements.push(measurement),
    }
    BackupPatch {
        body_measurements: Some(measurements),
        ..Default::default()
    }
}

pub fn remove_measurement(data: &BackupData, id: &str) -> BackupPatch {
    let measurements = data
        .body_measurements
        .iter()
        .flatten()
        .filter(|m| m.id != id)
        .cloned()
        .collect();
    BackupPatch {
        body_measurements: Some(measurements),
        ..Default::default()
    }
}

pub fn measurements_newest_first(data: &BackupData) -> Vec<&BodyMeasurement> {
    let mut measurements: Vec<_> = data.body_measurements.iter().flatten().collect();
    measurements.sort_by(|a, b| b.date.total_cmp(&a.date));
    measurements
}
