//! Document store - the single in-memory slot holding the open backup

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::model::{
    BackupData, BodyMeasurement, Exercise, SessionRoutine, UserProfile, WorkoutLog, WorkoutSet,
};
use crate::normalize::{NormalizeReport, normalize_with_report};
use crate::schema::{ValidationError, validate_backup};

/// Why an import was refused
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("file is empty")]
    Empty,
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Format error ({}): {}", .0.location(), .0.message)]
    Validation(#[from] ValidationError),
    #[error("Could not read file: {0}")]
    Read(#[from] std::io::Error),
}

/// Parse, normalize and validate backup text
pub fn parse_backup(raw: &str) -> Result<(BackupData, NormalizeReport), ImportError> {
    // Editors on Windows often save UTF-8 with a leading byte-order mark
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    if raw.trim().is_empty() {
        return Err(ImportError::Empty);
    }
    let value: Value = serde_json::from_str(raw)?;
    let (normalized, report) = normalize_with_report(value);
    let data = validate_backup(&normalized)?;
    Ok((data, report))
}

/// Top-level fields to replace in the open document. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupPatch {
    pub version: Option<String>,
    pub export_date: Option<f64>,
    pub sessions: Option<BTreeMap<String, SessionRoutine>>,
    pub exercises: Option<Vec<Exercise>>,
    pub workout_history: Option<Vec<WorkoutLog>>,
    pub sets: Option<Vec<WorkoutSet>>,
    pub user_profile: Option<UserProfile>,
    pub body_measurements: Option<Vec<BodyMeasurement>>,
}

impl BackupPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(self, data: &mut BackupData) {
        if let Some(version) = self.version {
            data.version = version;
        }
        if let Some(export_date) = self.export_date {
            data.export_date = export_date;
        }
        if let Some(sessions) = self.sessions {
            data.sessions = sessions;
        }
        if let Some(exercises) = self.exercises {
            data.exercises = exercises;
        }
        if let Some(history) = self.workout_history {
            data.workout_history = history;
        }
        if let Some(sets) = self.sets {
            data.sets = sets;
        }
        if let Some(profile) = self.user_profile {
            data.user_profile = Some(profile);
        }
        if let Some(measurements) = self.body_measurements {
            data.body_measurements = Some(measurements);
        }
    }
}

/// Session in the legacy wire shape: the routine JSON-encoded in `data`
#[derive(Serialize)]
struct RawSession<'a> {
    id: &'a str,
    name: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportPayload<'a> {
    version: &'a str,
    date: i64,
    exercises: &'a [Exercise],
    sessions: Vec<RawSession<'a>>,
    workouts: &'a [WorkoutLog],
    sets: &'a [WorkoutSet],
    #[serde(skip_serializing_if = "Option::is_none")]
    body_measurements: Option<&'a [BodyMeasurement]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_profile: Option<&'a UserProfile>,
}

/// Serialized backup ready to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Write into `dir` under the dated filename, returning the full path
    pub fn write_to(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Holds at most one validated backup plus transient import state
#[derive(Debug, Default)]
pub struct DocumentStore {
    data: Option<BackupData>,
    is_loading: bool,
    error: Option<String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&BackupData> {
        self.data.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Message of the last failed import, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Replace the document without validation
    pub fn set_data(&mut self, data: BackupData) {
        self.data = Some(data);
        self.error = None;
    }

    /// Import backup text. On failure the previous document is kept and
    /// the reason is available from [`DocumentStore::error`].
    pub fn import(&mut self, raw: &str) -> bool {
        self.is_loading = true;
        self.error = None;
        let result = parse_backup(raw);
        self.is_loading = false;

        match result {
            Ok((data, report)) => {
                if !report.is_clean() {
                    warn!(
                        dropped = report.dropped_sessions.len(),
                        "skipped unreadable session entries"
                    );
                }
                info!(
                    version = %data.version,
                    sessions = data.sessions.len(),
                    workouts = data.workout_history.len(),
                    "backup imported"
                );
                self.data = Some(data);
                true
            }
            Err(e) => self.fail(e),
        }
    }

    /// Read a backup file from disk and import it
    pub async fn import_file(&mut self, path: impl AsRef<Path>) -> bool {
        self.is_loading = true;
        match tokio::fs::read_to_string(path.as_ref()).await {
            Ok(text) => self.import(&text),
            Err(e) => {
                self.is_loading = false;
                self.fail(ImportError::Read(e))
            }
        }
    }

    fn fail(&mut self, error: ImportError) -> bool {
        warn!(%error, "import failed");
        self.error = Some(error.to_string());
        false
    }

    /// Shallow-merge top-level fields. Does nothing when no document is open.
    pub fn update(&mut self, patch: BackupPatch) {
        match self.data.as_mut() {
            Some(data) => {
                debug!(empty = patch.is_empty(), "updating document");
                patch.apply(data);
            }
            None => debug!("update ignored, no document loaded"),
        }
    }

    /// Serialize the open document in the legacy export shape
    pub fn export(&self) -> serde_json::Result<Option<ExportFile>> {
        self.export_at(Utc::now())
    }

    pub fn export_at(&self, now: DateTime<Utc>) -> serde_json::Result<Option<ExportFile>> {
        let Some(data) = self.data.as_ref() else {
            return Ok(None);
        };

        let sessions = data
            .sessions
            .values()
            .map(|session| {
                Ok(RawSession {
                    id: &session.id,
                    name: &session.name,
                    data: serde_json::to_string(session)?,
                })
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        let payload = ExportPayload {
            version: &data.version,
            date: now.timestamp_millis(),
            exercises: &data.exercises,
            sessions,
            workouts: &data.workout_history,
            sets: &data.sets,
            body_measurements: data.body_measurements.as_deref(),
            user_profile: data.user_profile.as_ref(),
        };

        Ok(Some(ExportFile {
            filename: export_filename(now),
            bytes: serde_json::to_vec_pretty(&payload)?,
        }))
    }

    /// Drop the document and any error
    pub fn reset(&mut self) {
        debug!("store reset");
        *self = Self::default();
    }
}

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("gym-tracker-fusion-{}.json", now.format("%Y-%m-%d"))
}
