//! Dashboard statistics over an open backup

use crate::model::BackupData;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_workouts: usize,
    pub total_sessions: usize,
    /// Σ reps × weight over every logged set
    pub total_tonnage: f64,
    /// Weight of the most recently appended body measurement
    pub last_body_weight: Option<f64>,
}

impl DashboardStats {
    pub fn from_backup(data: &BackupData) -> Self {
        Self {
            total_workouts: data.workout_history.len(),
            total_sessions: data.sessions.len(),
            total_tonnage: data.workout_history.iter().map(|w| w.tonnage()).sum(),
            last_body_weight: data
                .body_measurements
                .as_ref()
                .and_then(|m| m.last())
                .map(|m| m.weight),
        }
    }

    /// Tonnage in tonnes with one decimal, e.g. `1.4t`
    pub fn tonnage_label(&self) -> String {
        format!("{:.1}t", self.total_tonnage / 1000.0)
    }

    pub fn body_weight_label(&self) -> String {
        match self.last_body_weight {
            Some(w) if w != 0.0 => format!("{w}kg"),
            _ => "-".to_string(),
        }
    }
}

/// Row of the "recent workouts" panel
#[derive(Debug, Clone, PartialEq)]
pub struct RecentWorkout<'a> {
    pub id: &'a str,
    /// Session name, or the raw session id when the session no longer exists
    pub title: &'a str,
    pub date: f64,
    pub exercise_count: usize,
}

/// Last `limit` workouts in file order, newest appended first
pub fn recent_workouts(data: &BackupData, limit: usize) -> Vec<RecentWorkout<'_>> {
    data.workout_history
        .iter()
        .rev()
        .take(limit)
        .map(|w| RecentWorkout {
            id: &w.id,
            title: data
                .sessions
                .get(&w.session_id)
                .map(|s| s.name.as_str())
                .unwrap_or(w.session_id.as_str()),
            date: w.date,
            exercise_count: w.exercises.len(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub subtitle: &'a str,
    pub machine_count: usize,
}

/// First `limit` sessions with their machine counts
pub fn session_overview(data: &BackupData, limit: usize) -> Vec<SessionSummary<'_>> {
    data.sessions
        .values()
        .take(limit)
        .map(|s| SessionSummary {
            id: &s.id,
            name: &s.name,
            subtitle: &s.subtitle,
            machine_count: s.machine_count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::parse_backup;
    use serde_json::json;

    fn backup() -> BackupData {
        let raw = json!({
            "version": "1", "exportDate": 0,
            "sessions": {
                "legs": {"id": "legs", "name": "Legs", "subtitle": "Heavy", "sections": [
                    {"title": "Warm-up", "type": "warmup", "machines": []},
                    {"title": "Main", "type": "training", "machines": [
                        {"id": "sq", "name": "Squat", "targetSets": 5, "targetReps": 5,
                         "targetWeight": 100, "restTime": 180, "completedSets": []},
                        {"id": "lp", "name": "Leg press", "targetSets": 3, "targetReps": 12,
                         "targetWeight": 150, "restTime": 90, "completedSets": []},
                    ]},
                ]},
            },
            "workoutHistory": [
                {"id": "w1", "date": 1, "sessionId": "legs", "exercises": [
                    {"exerciseId": "sq", "exerciseName": "Squat",
                     "sets": [{"reps": 10, "weight": 50}, {"reps": 8, "weight": 55}]},
                ]},
                {"id": "w2", "date": 2, "sessionId": "deleted", "exercises": [
                    {"exerciseId": "lp", "exerciseName": "Leg press",
                     "sets": [{"reps": 12, "weight": 40}]},
                ]},
            ],
            "bodyMeasurements": [
                {"id": "m1", "date": 1, "weight": 82},
                {"id": "m2", "date": 2, "weight": 81.5},
            ],
        });
        parse_backup(&raw.to_string()).unwrap().0
    }

    #[test]
    fn test_dashboard_tonnage() {
        let stats = DashboardStats::from_backup(&backup());
        assert_eq!(stats.total_tonnage, 1420.0);
        assert_eq!(stats.tonnage_label(), "1.4t");
        assert_eq!(stats.total_workouts, 2);
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.last_body_weight, Some(81.5));
        assert_eq!(stats.body_weight_label(), "81.5kg");
    }

    #[test]
    fn test_no_measurements() {
        let mut data = backup();
        data.body_measurements = None;
        let stats = DashboardStats::from_backup(&data);
        assert_eq!(stats.last_body_weight, None);
        assert_eq!(stats.body_weight_label(), "-");
    }

    #[test]
    fn test_recent_workouts_newest_first() {
        let data = backup();
        let recent = recent_workouts(&data, 5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "w2");
        assert_eq!(recent[0].title, "deleted");
        assert_eq!(recent[1].title, "Legs");
        assert_eq!(recent[1].exercise_count, 1);
        assert_eq!(recent_workouts(&data, 1).len(), 1);
    }

    #[test]
    fn test_session_overview() {
        let data = backup();
        let overview = session_overview(&data, 5);
        assert_eq!(overview.len(), 1);
        assert_eq!(overview[0].machine_count, 2);
        assert_eq!(overview[0].subtitle, "Heavy");
    }
}
