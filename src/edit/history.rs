//! Workout history editing

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::millis;
use crate::model::{BackupData, ExerciseLog, SessionRoutine, Set, WorkoutLog};
use crate::store::BackupPatch;

/// Reps used for a new set when the exercise has none logged yet
const DEFAULT_REPS: u32 = 10;

/// Upper bound on placeholder sets generated per machine
pub const MAX_TEMPLATE_SETS: u32 = 100;

/// Epoch millis of UTC midnight for a calendar day
pub fn day_start_millis(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64
}

/// New workout pre-filled from a session template.
///
/// Every machine of every section becomes one exercise log holding
/// `targetSets` sets (at most [`MAX_TEMPLATE_SETS`]) of `targetReps` ×
/// `targetWeight`, stamped `now`.
pub fn workout_from_template(session: &SessionRoutine, date: f64, now: DateTime<Utc>) -> WorkoutLog {
    let ms = millis(now);
    WorkoutLog {
        id: format!("workout-{ms}"),
        date,
        session_id: session.id.clone(),
        exercises: session
            .machines()
            .map(|machine| ExerciseLog {
                exercise_id: machine
                    .exercise_id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| machine.id.clone()),
                exercise_name: machine.name.clone(),
                machine_ref: None,
                sets: (0..machine.target_sets.min(MAX_TEMPLATE_SETS))
                    .map(|_| Set {
                        reps: machine.target_reps,
                        weight: machine.target_weight,
                        timestamp: Some(ms as f64),
                        is_warmup: None,
                        rpe: None,
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn add_workout(data: &BackupData, workout: WorkoutLog) -> BackupPatch {
    let mut history = data.workout_history.clone();
    history.push(workout);
    history_patch(history)
}

pub fn remove_workout(data: &BackupData, id: &str) -> BackupPatch {
    history_patch(
        data.workout_history
            .iter()
            .filter(|w| w.id != id)
            .cloned()
            .collect(),
    )
}

/// Append a set copying the last one's reps and weight
pub fn append_set(
    data: &BackupData,
    workout_id: &str,
    exercise_index: usize,
    now: DateTime<Utc>,
) -> BackupPatch {
    with_exercise(data, workout_id, exercise_index, |exercise| {
        let last = exercise.sets.last();
        let set = Set {
            reps: last.map_or(DEFAULT_REPS, |s| s.reps),
            weight: last.map_or(0.0, |s| s.weight),
            timestamp: Some(millis(now) as f64),
            is_warmup: None,
            rpe: None,
        };
        exercise.sets.push(set);
    })
}

pub fn replace_set(
    data: &BackupData,
    workout_id: &str,
    exercise_index: usize,
    set_index: usize,
    set: Set,
) -> BackupPatch {
    with_exercise(data, workout_id, exercise_index, |exercise| {
        if let Some(slot) = exercise.sets.get_mut(set_index) {
            *slot = set;
        }
    })
}

pub fn remove_set(
    data: &BackupData,
    workout_id: &str,
    exercise_index: usize,
    set_index: usize,
) -> BackupPatch {
    with_exercise(data, workout_id, exercise_index, |exercise| {
        if set_index < exercise.sets.len() {
            exercise.sets.remove(set_index);
        }
    })
}

/// History sorted by date, most recent first
pub fn workouts_newest_first(data: &BackupData) -> Vec<&WorkoutLog> {
    let mut workouts: Vec<_> = data.workout_history.iter().collect();
    workouts.sort_by(|a, b| b.date.total_cmp(&a.date));
    workouts
}

fn with_exercise(
    data: &BackupData,
    workout_id: &str,
    exercise_index: usize,
    edit: impl FnOnce(&mut ExerciseLog),
) -> BackupPatch {
    let mut history = data.workout_history.clone();
    if let Some(exercise) = history
        .iter_mut()
        .find(|w| w.id == workout_id)
        .and_then(|w| w.exercises.get_mut(exercise_index))
    {
        edit(exercise);
    }
    history_patch(history)
}

fn history_patch(history: Vec<WorkoutLog>) -> BackupPatch {
    BackupPatch {
        workout_history: Some(history),
        ..Default::default()
    }
}
