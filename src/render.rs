// Interfaces to the collaborators outside the core: location, map, list, prompts

use crate::error::WorkoutError;
use crate::workout::{Activity, Metric, Position, Workout, WorkoutKind};

/// Supplies the position a new workout is recorded at
pub trait PositionProvider {
    fn current_position(&mut self) -> Result<Position, WorkoutError>;
}

/// Handle returned by a marker renderer for a placed marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Draws workout markers on a map
pub trait MarkerRenderer {
    fn add_marker(&mut self, position: Position, kind: WorkoutKind, description: &str) -> MarkerHandle;

    /// Remove every marker at this position
    fn remove_marker(&mut self, position: Position);

    /// Center the map on a position
    fn focus(&mut self, position: Position, zoom: u8);
}

/// Displays the workout list
pub trait ListRenderer {
    /// Add a workout's entry at the top of the list
    fn render(&mut self, workout: &Workout);

    /// Replace the displayed value of one field of an entry
    fn update_field(&mut self, id: &str, field: Field, value: &str);

    fn remove(&mut self, id: &str);

    /// Rearrange the entries to match `ids`
    fn reorder(&mut self, ids: &[String]);

    fn clear(&mut self);
}

/// Yes/no prompt gating destructive actions
pub trait Confirmation {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Displayed fields of a list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Distance,
    Duration,
    Pace,
    Speed,
    Cadence,
    ElevationGain,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Distance => "distance",
            Field::Duration => "duration",
            Field::Pace => "pace",
            Field::Speed => "speed",
            Field::Cadence => "cadence",
            Field::ElevationGain => "elevationGain",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Field::Title => "",
            Field::Distance => "km",
            Field::Duration => "min",
            Field::Pace => "min/km",
            Field::Speed => "km/h",
            Field::Cadence => "spm",
            Field::ElevationGain => "m",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field/value pairs shown for a workout, in display order.
///
/// The derived metric is shown with one decimal.
pub fn display_fields(workout: &Workout) -> Vec<(Field, String)> {
    let mut fields = vec![
        (Field::Title, workout.description()),
        (Field::Distance, workout.distance_km().to_string()),
        (Field::Duration, workout.duration_min().to_string()),
    ];

    match workout.metric() {
        Metric::Pace(pace) => fields.push((Field::Pace, format!("{:.1}", pace))),
        Metric::Speed(speed) => fields.push((Field::Speed, format!("{:.1}", speed))),
    }

    match workout.activity() {
        Activity::Running { cadence_spm } => fields.push((Field::Cadence, cadence_spm.to_string())),
        Activity::Cycling { elevation_gain_m } => fields.push((Field::ElevationGain, elevation_gain_m.to_string())),
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_fields_running() {
        let run = Workout::running(Position::new(39.0, -12.0).unwrap(), 5.2, 24.0, 178.0);
        let fields = display_fields(&run);

        assert_eq!(fields[0], (Field::Title, run.description()));
        assert_eq!(fields[1], (Field::Distance, "5.2".to_string()));
        assert_eq!(fields[2], (Field::Duration, "24".to_string()));
        assert_eq!(fields[3], (Field::Pace, "4.6".to_string()));
        assert_eq!(fields[4], (Field::Cadence, "178".to_string()));
    }

    #[test]
    fn test_display_fields_cycling() {
        let ride = Workout::cycling(Position::new(39.0, -12.0).unwrap(), 27.0, 95.0, -12.5);
        let fields = display_fields(&ride);

        assert_eq!(fields[3], (Field::Speed, "17.1".to_string()));
        assert_eq!(fields[4], (Field::ElevationGain, "-12.5".to_string()));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::ElevationGain.to_string(), "elevationGain");
        assert_eq!(Field::Pace.unit(), "min/km");
    }
}
