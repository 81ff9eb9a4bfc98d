//! Exercise library editing

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::millis;
use crate::model::{BackupData, Exercise, Field};
use crate::store::BackupPatch;

/// Group label for exercises without a muscle group
pub const UNGROUPED: &str = "Other";

pub fn new_exercise(name: &str, now: DateTime<Utc>) -> Exercise {
    let ms = millis(now);
    Exercise {
        id: format!("exercise_{ms}"),
        name: name.to_string(),
        muscle_group: Field::Null,
        equipment: Field::Null,
        notes: Field::Null,
        created_at: Field::Value(ms as f64),
    }
}

/// Replace the exercise with the same id, or append it
pub fn upsert_exercise(data: &BackupData, exercise: Exercise) -> BackupPatch {
    let mut exercises = data.exercises.clone();
    match exercises.iter_mut().find(|e| e.id == exercise.id) {
        Some(existing) => *existing = exercise,
        None => exercises.push(exercise),
    }
    BackupPatch {
        exercises: Some(exercises),
        ..Default::default()
    }
}

pub fn remove_exercise(data: &BackupData, id: &str) -> BackupPatch {
    BackupPatch {
        exercises: Some(data.exercises.iter().filter(|e| e.id != id).cloned().collect()),
        ..Default::default()
    }
}

/// Case-insensitive name search
pub fn search_exercises<'a>(data: &'a BackupData, query: &str) -> Vec<&'a Exercise> {
    let query = query.to_lowercase();
    data.exercises
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&query))
        .collect()
}

pub fn group_exercises_by_muscle<'a>(exercises: &[&'a Exercise]) -> BTreeMap<String, Vec<&'a Exercise>> {
    let mut groups: BTreeMap<String, Vec<&Exercise>> = BTreeMap::new();
    for &exercise in exercises {
        let group = match exercise.muscle_group.value() {
            Some(g) if !g.is_empty() => g.clone(),
            _ => UNGROUPED.to_string(),
        };
        groups.entry(group).or_default().push(exercise);
    }
    groups
}
