//! Session routine editing

use chrono::{DateTime, Utc};

use super::millis;
use crate::model::{BackupData, Machine, Section, SectionType, SessionRoutine};
use crate::store::BackupPatch;

pub fn new_session(now: DateTime<Utc>) -> SessionRoutine {
    SessionRoutine {
        id: format!("session-{}", millis(now)),
        name: "New session".to_string(),
        subtitle: String::new(),
        sections: Vec::new(),
    }
}

pub fn new_section(kind: SectionType) -> Section {
    Section {
        title: "New section".to_string(),
        kind,
        machines: Vec::new(),
    }
}

/// Placeholder machine: 3 × 10 at bodyweight, 90 s rest
pub fn new_machine(now: DateTime<Utc>) -> Machine {
    Machine {
        id: format!("exercise-{}", millis(now)),
        exercise_id: None,
        name: "New exercise".to_string(),
        target_sets: 3,
        target_reps: 10,
        target_weight: 0.0,
        rest_time: 90.0,
        completed_sets: Vec::new(),
        notes: None,
        duration: None,
        machine_ref: None,
        muscle_group: None,
        muscle_groups: None,
        is_skipped: None,
    }
}

/// Insert or replace a session under its own id
pub fn upsert_session(data: &BackupData, session: SessionRoutine) -> BackupPatch {
    let mut sessions = data.sessions.clone();
    sessions.insert(session.id.clone(), session);
    BackupPatch {
        sessions: Some(sessions),
        ..Default::default()
    }
}

pub fn remove_session(data: &BackupData, id: &str) -> BackupPatch {
    let mut sessions = data.sessions.clone();
    sessions.remove(id);
    BackupPatch {
        sessions: Some(sessions),
        ..Default::default()
    }
}
