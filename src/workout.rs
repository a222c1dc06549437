// Workout domain model

use crate::error::WorkoutError;
use crate::metric;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic position as latitude/longitude in degrees
///
/// Serialized as a `[lat, lng]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    /// Build a position, rejecting non-finite or out-of-range coordinates
    pub fn new(lat: f64, lng: f64) -> Result<Self, WorkoutError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(WorkoutError::Validation(format!("latitude out of range: {}", lat)));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(WorkoutError::Validation(format!("longitude out of range: {}", lng)));
        }
        Ok(Self { lat, lng })
    }
}

impl TryFrom<[f64; 2]> for Position {
    type Error = WorkoutError;

    fn try_from([lat, lng]: [f64; 2]) -> Result<Self, Self::Error> {
        Position::new(lat, lng)
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lat, p.lng]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized name used in labels
    pub fn title(self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }

    /// Validate measured inputs for a workout of this kind.
    ///
    /// `kind_value` is the cadence for running and the elevation gain for cycling.
    pub fn validate(self, distance_km: f64, duration_min: f64, kind_value: f64) -> Result<(), WorkoutError> {
        match self {
            WorkoutKind::Running => metric::validate_running(distance_km, duration_min, kind_value),
            WorkoutKind::Cycling => metric::validate_cycling(distance_km, duration_min, kind_value),
        }
    }
}

impl std::fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific measurements
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Running { cadence_spm: f64 },
    Cycling { elevation_gain_m: f64 },
}

impl Activity {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            Activity::Running { .. } => WorkoutKind::Running,
            Activity::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    /// The cadence (running) or elevation gain (cycling)
    pub fn value(&self) -> f64 {
        match *self {
            Activity::Running { cadence_spm } => cadence_spm,
            Activity::Cycling { elevation_gain_m } => elevation_gain_m,
        }
    }

    fn with_value(&self, value: f64) -> Self {
        match self {
            Activity::Running { .. } => Activity::Running { cadence_spm: value },
            Activity::Cycling { .. } => Activity::Cycling { elevation_gain_m: value },
        }
    }
}

/// Derived performance metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// min/km
    Pace(f64),
    /// km/h
    Speed(f64),
}

impl Metric {
    pub fn value(&self) -> f64 {
        match *self {
            Metric::Pace(v) | Metric::Speed(v) => v,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Pace(_) => "min/km",
            Metric::Speed(_) => "km/h",
        }
    }
}

/// What happens to the creation date when a workout is edited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditDatePolicy {
    /// Keep the original creation date, so the label does not change
    #[default]
    Preserve,
    /// Stamp the edited workout with the current time
    Restamp,
}

/// A single recorded workout
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    created_at: DateTime<Utc>,
    position: Position,
    distance_km: f64,
    duration_min: f64,
    activity: Activity,
    clicks: u32,
}

impl Workout {
    pub fn running(position: Position, distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self::create(position, distance_km, duration_min, Activity::Running { cadence_spm })
    }

    pub fn cycling(position: Position, distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Self {
        Self::create(position, distance_km, duration_min, Activity::Cycling { elevation_gain_m })
    }

    fn create(position: Position, distance_km: f64, duration_min: f64, activity: Activity) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            created_at: Utc::now(),
            position,
            distance_km,
            duration_min,
            activity,
            clicks: 0,
        }
    }

    /// Rebuild a workout from its persisted fields, re-deriving metric and label
    pub fn from_raw(raw: RawWorkout) -> Result<Self, WorkoutError> {
        let activity = match raw.kind {
            WorkoutKind::Running => Activity::Running {
                cadence_spm: raw
                    .cadence
                    .ok_or_else(|| WorkoutError::Validation(format!("running workout {} has no cadence", raw.id)))?,
            },
            WorkoutKind::Cycling => Activity::Cycling {
                elevation_gain_m: raw.elevation_gain.ok_or_else(|| {
                    WorkoutError::Validation(format!("cycling workout {} has no elevation gain", raw.id))
                })?,
            },
        };

        Ok(Self {
            id: raw.id,
            created_at: raw.date,
            position: raw.coords,
            distance_km: raw.distance,
            duration_min: raw.duration,
            activity,
            clicks: raw.clicks,
        })
    }

    /// Flatten into the persisted field map
    pub fn to_raw(&self) -> RawWorkout {
        let (cadence, elevation_gain) = match self.activity {
            Activity::Running { cadence_spm } => (Some(cadence_spm), None),
            Activity::Cycling { elevation_gain_m } => (None, Some(elevation_gain_m)),
        };
        let (pace, speed) = match self.metric() {
            Metric::Pace(v) => (Some(v), None),
            Metric::Speed(v) => (None, Some(v)),
        };

        RawWorkout {
            id: self.id.clone(),
            date: self.created_at,
            kind: self.kind(),
            coords: self.position,
            distance: self.distance_km,
            duration: self.duration_min,
            cadence,
            elevation_gain,
            pace,
            speed,
            description: Some(self.description()),
            clicks: self.clicks,
        }
    }

    /// A new record of the same kind, id, position and click count with new
    /// measured fields.
    pub fn edited(&self, distance_km: f64, duration_min: f64, kind_value: f64, policy: EditDatePolicy) -> Self {
        let created_at = match policy {
            EditDatePolicy::Preserve => self.created_at,
            EditDatePolicy::Restamp => Utc::now(),
        };

        Self {
            id: self.id.clone(),
            created_at,
            position: self.position,
            distance_km,
            duration_min,
            activity: self.activity.with_value(kind_value),
            clicks: self.clicks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn metric(&self) -> Metric {
        match self.activity {
            Activity::Running { .. } => Metric::Pace(metric::calc_pace(self.distance_km, self.duration_min)),
            Activity::Cycling { .. } => Metric::Speed(metric::calc_speed(self.distance_km, self.duration_min)),
        }
    }

    /// Label such as "Running on April 14", in local time
    pub fn description(&self) -> String {
        describe(self.kind(), &self.created_at.with_timezone(&Local))
    }

    pub fn click(&mut self) {
        self.clicks += 1;
    }
}

fn describe<Tz: TimeZone>(kind: WorkoutKind, date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} on {}", kind.title(), date.format("%B %-d"))
}

/// Persisted shape of a workout: a flat field map
///
/// `pace`, `speed` and `description` are written for readers of the raw data
/// and ignored when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWorkout {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    pub coords: Position,
    pub distance: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub clicks: u32,
}
