//! Canonical data model - the validated shape of a backup document

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Closed set of string values accepted by an enumerated field
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }

    /// Comma-separated list of accepted values, for error messages
    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Tri-state value for fields that may be missing, explicitly null, or set.
///
/// Absent fields are skipped on serialization (`skip_serializing_if =
/// "Field::is_absent"`), so null and absence survive a re-export unchanged.
/// Records are built by the schema validators only; none implement
/// `Deserialize`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => v.serialize(serializer),
            Field::Absent | Field::Null => serializer.serialize_none(),
        }
    }
}

/// Muscle groups targeted by a machine
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
    Glutes,
}

impl Choice for MuscleGroup {
    const ALL: &'static [Self] = &[
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Legs,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Core,
        MuscleGroup::Cardio,
        MuscleGroup::Glutes,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Legs => "legs",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Core => "core",
            MuscleGroup::Cardio => "cardio",
            MuscleGroup::Glutes => "glutes",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Warmup,
    Training,
    Cardio,
}

impl Choice for SectionType {
    const ALL: &'static [Self] = &[SectionType::Warmup, SectionType::Training, SectionType::Cardio];

    fn as_str(&self) -> &'static str {
        match self {
            SectionType::Warmup => "warmup",
            SectionType::Training => "training",
            SectionType::Cardio => "cardio",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Choice for Sex {
    const ALL: &'static [Self] = &[Sex::Male, Sex::Female];

    fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// One-rep-max estimation formula
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OneRmFormula {
    Epley,
    Brzycki,
    Lombardi,
}

impl Choice for OneRmFormula {
    const ALL: &'static [Self] = &[OneRmFormula::Epley, OneRmFormula::Brzycki, OneRmFormula::Lombardi];

    fn as_str(&self) -> &'static str {
        match self {
            OneRmFormula::Epley => "epley",
            OneRmFormula::Brzycki => "brzycki",
            OneRmFormula::Lombardi => "lombardi",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Kg,
    Lbs,
}

impl Choice for Units {
    const ALL: &'static [Self] = &[Units::Kg, Units::Lbs];

    fn as_str(&self) -> &'static str {
        match self {
            Units::Kg => "kg",
            Units::Lbs => "lbs",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Keyboard,
    Buttons,
}

impl Choice for InputMode {
    const ALL: &'static [Self] = &[InputMode::Keyboard, InputMode::Buttons];

    fn as_str(&self) -> &'static str {
        match self {
            InputMode::Keyboard => "keyboard",
            InputMode::Buttons => "buttons",
        }
    }
}

/// Where the rest timer is shown
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimerDisplayMode {
    Fullscreen,
    Bar,
    Notification,
}

impl Choice for TimerDisplayMode {
    const ALL: &'static [Self] = &[
        TimerDisplayMode::Fullscreen,
        TimerDisplayMode::Bar,
        TimerDisplayMode::Notification,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            TimerDisplayMode::Fullscreen => "fullscreen",
            TimerDisplayMode::Bar => "bar",
            TimerDisplayMode::Notification => "notification",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    System,
    Light,
    Dark,
    Oled,
}

impl Choice for ThemeMode {
    const ALL: &'static [Self] = &[ThemeMode::System, ThemeMode::Light, ThemeMode::Dark, ThemeMode::Oled];

    fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Oled => "oled",
        }
    }
}

/// A single performed (or planned) set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    pub reps: u32,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_warmup: Option<bool>,
    /// Rate of perceived exertion, 1-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

impl Set {
    pub fn tonnage(&self) -> f64 {
        self.reps as f64 * self.weight
    }
}

/// Exercise planned inside a session, with its targets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<String>,
    pub name: String,
    pub target_sets: u32,
    pub target_reps: u32,
    pub target_weight: f64,
    pub rest_time: f64, // seconds
    pub completed_sets: Vec<Set>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<MuscleGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_groups: Option<Vec<MuscleGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_skipped: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionType,
    pub machines: Vec<Machine>,
}

/// Reusable workout template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRoutine {
    pub id: String,
    pub name: String,
    pub subtitle: String,
    pub sections: Vec<Section>,
}

impl SessionRoutine {
    /// All machines across sections, in order
    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.sections.iter().flat_map(|s| s.machines.iter())
    }

    pub fn machine_count(&self) -> usize {
        self.sections.iter().map(|s| s.machines.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub exercise_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_ref: Option<String>,
    pub sets: Vec<Set>,
}

/// Dated record of one performed session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub date: f64, // epoch millis
    pub session_id: String,
    pub exercises: Vec<ExerciseLog>,
}

impl WorkoutLog {
    pub fn tonnage(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .map(Set::tonnage)
            .sum()
    }
}

/// Exercise library entry (raw DB naming)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub muscle_group: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub equipment: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub notes: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub created_at: Field<f64>,
}

/// Legacy per-set row from the raw DB export.
///
/// Known columns are typed; anything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WorkoutSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub workout_id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub exercise_id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub set_number: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub reps: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub weight: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub timestamp: Field<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub haptics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_ducking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<TimerDisplayMode>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_widgets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radar_muscles: Option<Vec<MuscleGroup>>,
    #[serde(rename = "oneRMFormula", skip_serializing_if = "Option::is_none")]
    pub one_rm_formula: Option<OneRmFormula>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_weight: Option<f64>, // kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_plates: Option<Vec<f64>>, // kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_increment: Option<f64>, // kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_screen_awake: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_mode: Option<InputMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerPreferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_mode: Option<ThemeMode>,
    /// 0.8 - 1.2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_reminders: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_frequency: Option<f64>, // days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acwr_alerts: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_mass: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visceral_fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bone_mass: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metabolic_age: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

/// Dated body composition reading (smart scale)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMeasurement {
    pub id: String,
    pub date: f64,
    pub weight: f64, // kg
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub height: Field<f64>, // cm
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub body_fat: Field<f64>, // %
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub muscle_mass: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub water_percentage: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub visceral_fat: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub bone_mass: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub bmr: Field<f64>, // kcal
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub metabolic_age: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub protein_percentage: Field<f64>,
}

/// Root backup document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub version: String,
    pub export_date: f64,
    /// Keyed by session id
    pub sessions: BTreeMap<String, SessionRoutine>,
    pub exercises: Vec<Exercise>,
    pub workout_history: Vec<WorkoutLog>,
    pub sets: Vec<WorkoutSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_measurements: Option<Vec<BodyMeasurement>>,
}

/// Shared program: a set of session templates without any history
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramExport {
    pub version: String,
    pub export_date: f64,
    pub sessions: BTreeMap<String, SessionRoutine>,
}

/// Single shared session template
#[derive(Debug, Clone, PartialEq)]
pub struct SessionExport {
    pub version: String,
    pub export_date: f64,
    /// Id of the session this one was exported from
    pub source_id: Option<String>,
    pub session: SessionRoutine,
}
