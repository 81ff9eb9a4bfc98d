//! Schema validation - check a normalized document and build `BackupData`
//!
//! Validation is fail-fast: the first violation reached stops the walk and
//! is the only one reported.

mod path;
mod records;
mod rules;

use serde_json::Value;

use crate::model::{BackupData, ProgramExport, SessionExport};
use path::Path;

pub type Result<T> = std::result::Result<T, ValidationError>;

/// First constraint violation found in a document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {}", location(.path), .message)]
pub struct ValidationError {
    /// Dot-joined keys and indices from the root, empty for the root itself
    pub path: String,
    pub message: String,
}

impl ValidationError {
    /// Path for display, `(root)` when the document itself is wrong
    pub fn location(&self) -> &str {
        location(&self.path)
    }
}

fn location(path: &str) -> &str {
    if path.is_empty() { "(root)" } else { path }
}

/// Validate a normalized backup document
pub fn validate_backup(value: &Value) -> Result<BackupData> {
    records::backup(value, &Path::root())
}

/// Validate a shared program (`type: "program_export"`)
pub fn validate_program_export(value: &Value) -> Result<ProgramExport> {
    records::program_export(value, &Path::root())
}

/// Validate a single shared session (`type: "session_export"`)
pub fn validate_session_export(value: &Value) -> Result<SessionExport> {
    records::session_export(value, &Path::root())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn session(id: &str, name: &str, sets: Value) -> Value {
        json!({
            "id": id, "name": name, "subtitle": "",
            "sections": [{
                "title": "Main", "type": "training",
                "machines": [{
                    "id": format!("{id}-m1"), "name": "Bench",
                    "targetSets": 3, "targetReps": 8, "targetWeight": 60, "restTime": 120,
                    "completedSets": sets,
                }],
            }],
        })
    }

    fn document() -> Value {
        json!({
            "version": "2.1",
            "exportDate": 1700000000000u64,
            "sessions": {"a": session("a", "A", json!([])), "b": session("b", "B", json!([]))},
            "exercises": [],
            "workoutHistory": [{
                "id": "w1", "date": 1700000000000u64, "sessionId": "a",
                "exercises": [{
                    "exerciseId": "a-m1", "exerciseName": "Bench",
                    "sets": [{"reps": 8, "weight": 60}],
                }],
            }],
            "sets": [],
        })
    }

    #[test]
    fn test_valid_document() {
        let backup = validate_backup(&document()).unwrap();
        assert_eq!(backup.version, "2.1");
        assert_eq!(backup.sessions.len(), 2);
        assert_eq!(backup.workout_history[0].exercises[0].sets[0].reps, 8);
        assert!(backup.user_profile.is_none());
        assert!(backup.body_measurements.is_none());
    }

    #[test]
    fn test_root_must_be_object() {
        let err = validate_backup(&json!([1, 2])).unwrap_err();
        assert_eq!(err.location(), "(root)");
        assert_eq!(err.to_string(), "(root): expected an object");
    }

    #[test]
    fn test_version_coerced() {
        let mut doc = document();
        doc["version"] = json!(3);
        assert_eq!(validate_backup(&doc).unwrap().version, "3");
        doc["version"] = json!(false);
        assert_eq!(validate_backup(&doc).unwrap().version, "false");
        doc["version"] = json!(null);
        assert_eq!(validate_backup(&doc).unwrap_err().path, "version");
    }

    #[test]
    fn test_collections_default_empty() {
        let doc = json!({"version": "1", "exportDate": 0, "sessions": {}});
        let backup = validate_backup(&doc).unwrap();
        assert!(backup.exercises.is_empty());
        assert!(backup.workout_history.is_empty());
        assert!(backup.sets.is_empty());
    }

    #[test]
    fn test_sessions_required() {
        let err = validate_backup(&json!({"version": "1", "exportDate": 0})).unwrap_err();
        assert_eq!(err.to_string(), "sessions: is required");
    }

    #[test]
    fn test_set_reps_path() {
        for reps in [json!(0), json!(-1), json!(2.5)] {
            let mut doc = document();
            doc["workoutHistory"][0]["exercises"][0]["sets"][0]["reps"] = reps;
            let err = validate_backup(&doc).unwrap_err();
            assert_eq!(err.path, "workoutHistory.0.exercises.0.sets.0.reps");
            assert_eq!(err.message, "must be a positive integer");
        }
    }

    #[test]
    fn test_fail_fast_order() {
        let mut doc = document();
        doc["sessions"]["a"]["name"] = json!("");
        doc["sessions"]["b"] = session("b", "B", json!([{"reps": 0, "weight": 10}]));
        let err = validate_backup(&doc).unwrap_err();
        assert_eq!(err.path, "sessions.a.name");

        doc["sessions"]["a"]["name"] = json!("A");
        let err = validate_backup(&doc).unwrap_err();
        assert_eq!(err.path, "sessions.b.sections.0.machines.0.completedSets.0.reps");
    }

    #[test]
    fn test_top_level_order() {
        let mut doc = document();
        doc["exportDate"] = json!("yesterday");
        doc["workoutHistory"][0]["id"] = json!("");
        assert_eq!(validate_backup(&doc).unwrap_err().path, "exportDate");
    }

    #[test]
    fn test_normalized_sequence_validates() {
        let raw = json!({
            "version": 1,
            "date": 1700000000000u64,
            "sessions": [
                {"id": "a", "name": "A", "subtitle": "", "sections": []},
                {"id": "b", "name": "B", "subtitle": "", "sections": []},
            ],
        });
        let backup = validate_backup(&normalize(raw)).unwrap();
        assert_eq!(backup.sessions.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(backup.sessions["b"].name, "B");
        assert_eq!(backup.export_date, 1700000000000.0);
    }

    #[test]
    fn test_sequence_failure_follows_key_order() {
        let raw = json!({
            "version": "1", "exportDate": 0,
            "sessions": [
                {"id": "b", "name": "", "subtitle": "", "sections": []},
                {"id": "a", "name": "", "subtitle": "", "sections": []},
            ],
        });
        let err = validate_backup(&normalize(raw)).unwrap_err();
        assert_eq!(err.path, "sessions.a.name");
    }

    #[test]
    fn test_numeric_ids_serialize_as_strings() {
        let mut doc = document();
        doc["exercises"] = json!([{"id": 7, "name": "Dips"}]);
        doc["bodyMeasurements"] = json!([{"id": 2.0, "date": 1, "weight": 80}]);
        let backup = validate_backup(&doc).unwrap();
        let out = serde_json::to_value(&backup).unwrap();
        assert_eq!(out["exercises"][0], json!({"id": "7", "name": "Dips"}));
        assert_eq!(out["bodyMeasurements"][0]["id"], json!("2"));
    }

    #[test]
    fn test_program_export() {
        let doc = json!({
            "version": "1", "exportDate": 5, "type": "program_export",
            "sessions": {"a": session("a", "A", json!([]))},
        });
        let program = validate_program_export(&doc).unwrap();
        assert_eq!(program.sessions["a"].machine_count(), 1);
        assert_eq!(program.export_date, 5.0);

        let mut wrong = doc.clone();
        wrong["type"] = json!("session_export");
        let err = validate_program_export(&wrong).unwrap_err();
        assert_eq!(err.to_string(), "type: must be \"program_export\"");

        let mut bad_set = doc;
        bad_set["sessions"]["a"] = session("a", "A", json!([{"reps": 0, "weight": 1}]));
        let err = validate_program_export(&bad_set).unwrap_err();
        assert_eq!(err.path, "sessions.a.sections.0.machines.0.completedSets.0.reps");
    }

    #[test]
    fn test_session_export() {
        let doc = json!({
            "version": 2, "exportDate": 5, "type": "session_export",
            "sourceId": "a", "session": session("a", "A", json!([])),
        });
        let export = validate_session_export(&doc).unwrap();
        assert_eq!(export.version, "2");
        assert_eq!(export.source_id.as_deref(), Some("a"));
        assert_eq!(export.session.name, "A");

        let mut no_source = doc.clone();
        no_source.as_object_mut().unwrap().remove("sourceId");
        assert_eq!(validate_session_export(&no_source).unwrap().source_id, None);

        let mut wrong = doc.clone();
        wrong["type"] = json!("program_export");
        assert_eq!(validate_session_export(&wrong).unwrap_err().path, "type");

        let mut missing = doc;
        missing.as_object_mut().unwrap().remove("session");
        assert_eq!(validate_session_export(&missing).unwrap_err().to_string(), "session: is required");
    }
}
