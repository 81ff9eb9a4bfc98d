//! Validators for each record of the backup document.
//!
//! Fields are checked in struct order, so the first failure reported is
//! always the first one reached walking the document top to bottom.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::Result;
use super::path::Path;
use super::rules::{
    between, boolean, choice, coerced_string, defaulted_list, list, literal, non_empty,
    non_negative, nullable, number, object, optional, positive_int, required, string,
};
use crate::model::{
    BackupData, BodyMeasurement, Exercise, ExerciseLog, Machine, Preferences, ProgramExport,
    Section, SessionExport, SessionRoutine, Set, TimerPreferences, UserProfile, WorkoutLog,
    WorkoutSet,
};

/// Columns of a legacy set row that get typed; the rest are carried over
const WORKOUT_SET_COLUMNS: &[&str] = &[
    "id",
    "workout_id",
    "exercise_id",
    "set_number",
    "reps",
    "weight",
    "timestamp",
];

pub fn backup(value: &Value, path: &Path<'_>) -> Result<BackupData> {
    let map = object(value, path)?;
    Ok(BackupData {
        version: required(map, "version", path, coerced_string)?,
        export_date: required(map, "exportDate", path, number)?,
        sessions: required(map, "sessions", path, sessions)?,
        exercises: defaulted_list(map, "exercises", path, exercise)?,
        workout_history: defaulted_list(map, "workoutHistory", path, workout_log)?,
        sets: defaulted_list(map, "sets", path, workout_set)?,
        user_profile: optional(map, "userProfile", path, user_profile)?,
        body_measurements: optional(map, "bodyMeasurements", path, |v, p| {
            list(v, p, body_measurement)
        })?,
    })
}

pub fn program_export(value: &Value, path: &Path<'_>) -> Result<ProgramExport> {
    let map = object(value, path)?;
    let version = required(map, "version", path, coerced_string)?;
    let export_date = required(map, "exportDate", path, number)?;
    required(map, "type", path, literal("program_export"))?;
    Ok(ProgramExport {
        version,
        export_date,
        sessions: required(map, "sessions", path, sessions)?,
    })
}

pub fn session_export(value: &Value, path: &Path<'_>) -> Result<SessionExport> {
    let map = object(value, path)?;
    let version = required(map, "version", path, coerced_string)?;
    let export_date = required(map, "exportDate", path, number)?;
    required(map, "type", path, literal("session_export"))?;
    Ok(SessionExport {
        version,
        export_date,
        source_id: optional(map, "sourceId", path, string)?,
        session: required(map, "session", path, session_routine)?,
    })
}

/// Sessions mapping, walked in sorted key order.
///
/// A legacy sessions sequence has already become a mapping by now, so its
/// original element order is not what decides which failure comes first.
fn sessions(value: &Value, path: &Path<'_>) -> Result<BTreeMap<String, SessionRoutine>> {
    let map = object(value, path)?;
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let mut sessions = BTreeMap::new();
    for key in keys {
        let entry_path = path.key(key);
        let session = session_routine(&map[key.as_str()], &entry_path)?;
        if session.id != *key {
            return Err(entry_path
                .key("id")
                .error(format!("must match its sessions key \"{key}\"")));
        }
        sessions.insert(key.clone(), session);
    }
    Ok(sessions)
}

fn session_routine(value: &Value, path: &Path<'_>) -> Result<SessionRoutine> {
    let map = object(value, path)?;
    Ok(SessionRoutine {
        id: required(map, "id", path, non_empty)?,
        name: required(map, "name", path, non_empty)?,
        subtitle: required(map, "subtitle", path, string)?,
        sections: required(map, "sections", path, |v, p| list(v, p, section))?,
    })
}

fn section(value: &Value, path: &Path<'_>) -> Result<Section> {
    let map = object(value, path)?;
    Ok(Section {
        title: required(map, "title", path, non_empty)?,
        kind: required(map, "type", path, choice)?,
        machines: required(map, "machines", path, |v, p| list(v, p, machine))?,
    })
}

fn machine(value: &Value, path: &Path<'_>) -> Result<Machine> {
    let map = object(value, path)?;
    Ok(Machine {
        id: required(map, "id", path, non_empty)?,
        exercise_id: optional(map, "exerciseId", path, string)?,
        name: required(map, "name", path, non_empty)?,
        target_sets: required(map, "targetSets", path, positive_int)?,
        target_reps: required(map, "targetReps", path, positive_int)?,
        target_weight: required(map, "targetWeight", path, non_negative)?,
        rest_time: required(map, "restTime", path, non_negative)?,
        completed_sets: required(map, "completedSets", path, |v, p| list(v, p, set))?,
        notes: optional(map, "notes", path, string)?,
        duration: optional(map, "duration", path, string)?,
        machine_ref: optional(map, "machineRef", path, string)?,
        muscle_group: optional(map, "muscleGroup", path, choice)?,
        muscle_groups: optional(map, "muscleGroups", path, |v, p| list(v, p, choice))?,
        is_skipped: optional(map, "isSkipped", path, boolean)?,
    })
}

fn set(value: &Value, path: &Path<'_>) -> Result<Set> {
    let map = object(value, path)?;
    Ok(Set {
        reps: required(map, "reps", path, positive_int)?,
        weight: required(map, "weight", path, non_negative)?,
        timestamp: optional(map, "timestamp", path, number)?,
        is_warmup: optional(map, "isWarmup", path, boolean)?,
        rpe: optional(map, "rpe", path, between(1.0, 10.0))?,
    })
}

fn exercise(value: &Value, path: &Path<'_>) -> Result<Exercise> {
    let map = object(value, path)?;
    Ok(Exercise {
        id: required(map, "id", path, coerced_string)?,
        name: required(map, "name", path, non_empty)?,
        muscle_group: nullable(map, "muscle_group", path, string)?,
        equipment: nullable(map, "equipment", path, string)?,
        notes: nullable(map, "notes", path, string)?,
        created_at: nullable(map, "created_at", path, number)?,
    })
}

fn workout_log(value: &Value, path: &Path<'_>) -> Result<WorkoutLog> {
    let map = object(value, path)?;
    Ok(WorkoutLog {
        id: required(map, "id", path, non_empty)?,
        date: required(map, "date", path, number)?,
        session_id: required(map, "sessionId", path, string)?,
        exercises: defaulted_list(map, "exercises", path, exercise_log)?,
    })
}

fn exercise_log(value: &Value, path: &Path<'_>) -> Result<ExerciseLog> {
    let map = object(value, path)?;
    Ok(ExerciseLog {
        exercise_id: required(map, "exerciseId", path, non_empty)?,
        exercise_name: required(map, "exerciseName", path, non_empty)?,
        machine_ref: optional(map, "machineRef", path, string)?,
        sets: required(map, "sets", path, |v, p| list(v, p, set))?,
    })
}

fn workout_set(value: &Value, path: &Path<'_>) -> Result<WorkoutSet> {
    let map = object(value, path)?;
    let extra: Map<String, Value> = map
        .iter()
        .filter(|(k, _)| !WORKOUT_SET_COLUMNS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Ok(WorkoutSet {
        id: optional(map, "id", path, coerced_string)?,
        workout_id: nullable(map, "workout_id", path, coerced_string)?,
        exercise_id: nullable(map, "exercise_id", path, coerced_string)?,
        set_number: nullable(map, "set_number", path, number)?,
        reps: nullable(map, "reps", path, number)?,
        weight: nullable(map, "weight", path, number)?,
        timestamp: nullable(map, "timestamp", path, number)?,
        extra,
    })
}

fn user_profile(value: &Value, path: &Path<'_>) -> Result<UserProfile> {
    let map = object(value, path)?;
    Ok(UserProfile {
        weight: optional(map, "weight", path, number)?,
        height: optional(map, "height", path, number)?,
        body_fat: optional(map, "bodyFat", path, number)?,
        sex: optional(map, "sex", path, choice)?,
        muscle_mass: optional(map, "muscleMass", path, number)?,
        water_percentage: optional(map, "waterPercentage", path, number)?,
        visceral_fat: optional(map, "visceralFat", path, number)?,
        bone_mass: optional(map, "boneMass", path, number)?,
        bmr: optional(map, "bmr", path, number)?,
        metabolic_age: optional(map, "metabolicAge", path, number)?,
        preferences: optional(map, "preferences", path, preferences)?,
    })
}

fn preferences(value: &Value, path: &Path<'_>) -> Result<Preferences> {
    let map = object(value, path)?;
    Ok(Preferences {
        active_widgets: optional(map, "activeWidgets", path, |v, p| list(v, p, string))?,
        radar_muscles: optional(map, "radarMuscles", path, |v, p| list(v, p, choice))?,
        one_rm_formula: optional(map, "oneRMFormula", path, choice)?,
        units: optional(map, "units", path, choice)?,
        bar_weight: optional(map, "barWeight", path, number)?,
        available_plates: optional(map, "availablePlates", path, |v, p| list(v, p, number))?,
        min_increment: optional(map, "minIncrement", path, number)?,
        keep_screen_awake: optional(map, "keepScreenAwake", path, boolean)?,
        input_mode: optional(map, "inputMode", path, choice)?,
        timer: optional(map, "timer", path, timer_preferences)?,
        theme_mode: optional(map, "themeMode", path, choice)?,
        font_scale: optional(map, "fontScale", path, between(0.8, 1.2))?,
        workout_reminders: optional(map, "workoutReminders", path, boolean)?,
        reminder_frequency: optional(map, "reminderFrequency", path, number)?,
        acwr_alerts: optional(map, "acwrAlerts", path, boolean)?,
    })
}

fn timer_preferences(value: &Value, path: &Path<'_>) -> Result<TimerPreferences> {
    let map = object(value, path)?;
    Ok(TimerPreferences {
        sound: optional(map, "sound", path, boolean)?,
        haptics: optional(map, "haptics", path, boolean)?,
        audio_ducking: optional(map, "audioDucking", path, boolean)?,
        display_mode: optional(map, "displayMode", path, choice)?,
    })
}

fn body_measurement(value: &Value, path: &Path<'_>) -> Result<BodyMeasurement> {
    let map = object(value, path)?;
    Ok(BodyMeasurement {
        id: required(map, "id", path, coerced_string)?,
        date: required(map, "date", path, number)?,
        weight: required(map, "weight", path, number)?,
        height: nullable(map, "height", path, number)?,
        body_fat: nullable(map, "bodyFat", path, number)?,
        muscle_mass: nullable(map, "muscleMass", path, number)?,
        water_percentage: nullable(map, "waterPercentage", path, number)?,
        visceral_fat: nullable(map, "visceralFat", path, number)?,
        bone_mass: nullable(map, "boneMass", path, number)?,
        bmr: nullable(map, "bmr", path, number)?,
        metabolic_age: nullable(map, "metabolicAge", path, number)?,
        protein_percentage: nullable(map, "proteinPercentage", path, number)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, MuscleGroup, SectionType, Sex, ThemeMode, TimerDisplayMode};
    use serde_json::json;

    fn at(path: &str, message: &str) -> (String, String) {
        (path.to_string(), message.to_string())
    }

    fn failure<T: std::fmt::Debug>(result: Result<T>) -> (String, String) {
        let err = result.unwrap_err();
        (err.path, err.message)
    }

    fn machine_json() -> Value {
        json!({
            "id": "m1", "name": "Leg press",
            "targetSets": 3, "targetReps": 12, "targetWeight": 80, "restTime": 90,
            "completedSets": [],
        })
    }

    #[test]
    fn test_set_valid() {
        let parsed = set(&json!({"reps": 8, "weight": 0, "isWarmup": true, "rpe": 7.5}), &Path::root()).unwrap();
        assert_eq!(parsed.reps, 8);
        assert_eq!(parsed.weight, 0.0);
        assert_eq!(parsed.is_warmup, Some(true));
        assert_eq!(parsed.rpe, Some(7.5));
        assert_eq!(parsed.timestamp, None);
    }

    #[test]
    fn test_set_rejections() {
        let root = Path::root();
        assert_eq!(
            failure(set(&json!({"reps": 5, "weight": -1}), &root)),
            at("weight", "must be a non-negative number")
        );
        assert_eq!(
            failure(set(&json!({"reps": 5, "weight": 1, "rpe": 0}), &root)),
            at("rpe", "must be a number between 1 and 10")
        );
        assert_eq!(failure(set(&json!({"weight": 1}), &root)), at("reps", "is required"));
        assert_eq!(failure(set(&json!([]), &root)), at("", "expected an object"));
    }

    #[test]
    fn test_machine_optional_fields() {
        let mut value = machine_json();
        value["muscleGroup"] = json!("legs");
        value["muscleGroups"] = json!(["legs", "glutes"]);
        value["isSkipped"] = json!(false);
        let parsed = machine(&value, &Path::root()).unwrap();
        assert_eq!(parsed.muscle_group, Some(MuscleGroup::Legs));
        assert_eq!(parsed.muscle_groups, Some(vec![MuscleGroup::Legs, MuscleGroup::Glutes]));
        assert_eq!(parsed.is_skipped, Some(false));
        assert_eq!(parsed.exercise_id, None);
    }

    #[test]
    fn test_machine_rejects_bad_muscle_group() {
        let mut value = machine_json();
        value["muscleGroups"] = json!(["legs", "neck"]);
        let (path, message) = failure(machine(&value, &Path::root()));
        assert_eq!(path, "muscleGroups.1");
        assert!(message.starts_with("must be one of: chest"));
    }

    #[test]
    fn test_machine_zero_target_sets() {
        let mut value = machine_json();
        value["targetSets"] = json!(0);
        assert_eq!(
            failure(machine(&value, &Path::root())),
            at("targetSets", "must be a positive integer")
        );
    }

    #[test]
    fn test_section_type() {
        let value = json!({"title": "Warm-up", "type": "warmup", "machines": [machine_json()]});
        let parsed = section(&value, &Path::root()).unwrap();
        assert_eq!(parsed.kind, SectionType::Warmup);
        assert_eq!(parsed.machines.len(), 1);

        let value = json!({"title": "", "type": "warmup", "machines": []});
        assert_eq!(
            failure(section(&value, &Path::root())),
            at("title", "must be a non-empty string")
        );
    }

    #[test]
    fn test_session_subtitle_may_be_empty() {
        let value = json!({"id": "a", "name": "A", "subtitle": "", "sections": []});
        assert_eq!(session_routine(&value, &Path::root()).unwrap().subtitle, "");
    }

    #[test]
    fn test_session_key_must_match_id() {
        let value = json!({"a": {"id": "b", "name": "B", "subtitle": "", "sections": []}});
        assert_eq!(
            failure(sessions(&value, &Path::root())),
            at("a.id", "must match its sessions key \"a\"")
        );
    }

    #[test]
    fn test_workout_log_exercises_default_empty() {
        let value = json!({"id": "w1", "date": 1700000000000u64, "sessionId": "missing"});
        let parsed = workout_log(&value, &Path::root()).unwrap();
        assert!(parsed.exercises.is_empty());
        assert_eq!(parsed.session_id, "missing");
    }

    #[test]
    fn test_workout_log_date_must_be_number() {
        let value = json!({"id": "w1", "date": "2024-01-01", "sessionId": "s"});
        assert_eq!(failure(workout_log(&value, &Path::root())), at("date", "must be a number"));
    }

    #[test]
    fn test_exercise_nullable_fields() {
        let value = json!({"id": 12, "name": "Row", "muscle_group": null, "created_at": 1});
        let parsed = exercise(&value, &Path::root()).unwrap();
        assert_eq!(parsed.id, "12");
        assert_eq!(parsed.muscle_group, Field::Null);
        assert_eq!(parsed.equipment, Field::Absent);
        assert_eq!(parsed.created_at, Field::Value(1.0));

        let value = json!({"id": "e", "name": "Row", "equipment": 3});
        assert_eq!(failure(exercise(&value, &Path::root())), at("equipment", "must be a string"));
    }

    #[test]
    fn test_workout_set_keeps_unknown_columns() {
        let value = json!({"id": 4, "workout_id": 9, "reps": 10, "weight": null, "is_pr": 1});
        let parsed = workout_set(&value, &Path::root()).unwrap();
        assert_eq!(parsed.id.as_deref(), Some("4"));
        assert_eq!(parsed.workout_id, Field::Value("9".to_string()));
        assert_eq!(parsed.reps, Field::Value(10.0));
        assert_eq!(parsed.weight, Field::Null);
        assert_eq!(parsed.extra.get("is_pr"), Some(&json!(1)));
        assert!(!parsed.extra.contains_key("reps"));
    }

    #[test]
    fn test_user_profile_preferences() {
        let value = json!({
            "sex": "female", "weight": 62,
            "preferences": {
                "themeMode": "oled", "fontScale": 1.1, "availablePlates": [25, 20, 10],
                "timer": {"displayMode": "bar", "sound": true},
            },
        });
        let parsed = user_profile(&value, &Path::root()).unwrap();
        assert_eq!(parsed.sex, Some(Sex::Female));
        let prefs = parsed.preferences.unwrap();
        assert_eq!(prefs.theme_mode, Some(ThemeMode::Oled));
        assert_eq!(prefs.available_plates, Some(vec![25.0, 20.0, 10.0]));
        assert_eq!(prefs.timer.unwrap().display_mode, Some(TimerDisplayMode::Bar));
    }

    #[test]
    fn test_user_profile_rejections() {
        let value = json!({"sex": "other"});
        assert_eq!(
            failure(user_profile(&value, &Path::root())),
            at("sex", "must be one of: male, female")
        );
        let value = json!({"preferences": {"fontScale": 1.5}});
        assert_eq!(
            failure(user_profile(&value, &Path::root())).0,
            "preferences.fontScale"
        );
        let value = json!({"preferences": {"timer": {"displayMode": "popup"}}});
        assert_eq!(
            failure(user_profile(&value, &Path::root())).0,
            "preferences.timer.displayMode"
        );
    }

    #[test]
    fn test_body_measurement() {
        let value = json!({"id": 3, "date": 1, "weight": 81.2, "bodyFat": 17, "height": null});
        let parsed = body_measurement(&value, &Path::root()).unwrap();
        assert_eq!(parsed.id, "3");
        assert_eq!(parsed.body_fat, Field::Value(17.0));
        assert_eq!(parsed.height, Field::Null);
        assert_eq!(parsed.bmr, Field::Absent);

        let value = json!({"id": "m", "date": 1});
        assert_eq!(failure(body_measurement(&value, &Path::root())), at("weight", "is required"));
    }
}
