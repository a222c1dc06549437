// Derived metrics and input validation for workouts

use crate::error::WorkoutError;
use tracing::debug;

/// Running pace in min/km
pub fn calc_pace(distance_km: f64, duration_min: f64) -> f64 {
    debug!(distance_km, duration_min, "Calculating pace");
    duration_min / distance_km
}

/// Cycling speed in km/h
pub fn calc_speed(distance_km: f64, duration_min: f64) -> f64 {
    debug!(distance_km, duration_min, "Calculating speed");
    distance_km / (duration_min / 60.0)
}

/// Running inputs: distance, duration and cadence must all be finite and positive.
pub fn validate_running(distance_km: f64, duration_min: f64, cadence_spm: f64) -> Result<(), WorkoutError> {
    check_finite(&[
        ("distance", distance_km),
        ("duration", duration_min),
        ("cadence", cadence_spm),
    ])?;
    check_positive(&[
        ("distance", distance_km),
        ("duration", duration_min),
        ("cadence", cadence_spm),
    ])
}

/// Cycling inputs: all finite, but only distance and duration must be positive.
///
/// Elevation gain may be zero or negative (a downhill ride).
pub fn validate_cycling(distance_km: f64, duration_min: f64, elevation_gain_m: f64) -> Result<(), WorkoutError> {
    check_finite(&[
        ("distance", distance_km),
        ("duration", duration_min),
        ("elevation gain", elevation_gain_m),
    ])?;
    check_positive(&[("distance", distance_km), ("duration", duration_min)])
}

fn check_finite(inputs: &[(&str, f64)]) -> Result<(), WorkoutError> {
    match inputs.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, value)) => Err(WorkoutError::Validation(format!("{} is not a number: {}", name, value))),
        None => Ok(()),
    }
}

fn check_positive(inputs: &[(&str, f64)]) -> Result<(), WorkoutError> {
    match inputs.iter().find(|(_, v)| *v <= 0.0) {
        Some((name, value)) => Err(WorkoutError::Validation(format!("{} must be positive: {}", name, value))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_pace_exact() {
        assert_eq!(calc_pace(5.2, 24.0), 24.0 / 5.2);
        assert!((calc_pace(5.2, 24.0) - 4.615384615).abs() < 1e-9);
        assert_eq!(calc_pace(10.0, 50.0), 5.0);
    }

    #[test]
    fn test_calc_speed_exact() {
        assert_eq!(calc_speed(27.0, 95.0), 27.0 / (95.0 / 60.0));
        assert!((calc_speed(27.0, 95.0) - 17.0526).abs() < 1e-4);
        assert_eq!(calc_speed(30.0, 60.0), 30.0);
    }

    #[test]
    fn test_validate_running() {
        assert!(validate_running(5.2, 24.0, 178.0).is_ok());
        assert!(validate_running(0.0, 24.0, 178.0).is_err());
        assert!(validate_running(5.2, -1.0, 178.0).is_err());
        assert!(validate_running(5.2, 24.0, -178.0).is_err());
        assert!(validate_running(5.2, 24.0, 0.0).is_err());
        assert!(validate_running(f64::NAN, 24.0, 178.0).is_err());
        assert!(validate_running(5.2, f64::INFINITY, 178.0).is_err());
    }

    #[test]
    fn test_validate_cycling_allows_any_elevation_sign() {
        assert!(validate_cycling(27.0, 95.0, 523.0).is_ok());
        assert!(validate_cycling(27.0, 95.0, 0.0).is_ok());
        assert!(validate_cycling(27.0, 95.0, -120.0).is_ok());
        assert!(validate_cycling(27.0, 95.0, f64::NAN).is_err());
        assert!(validate_cycling(-27.0, 95.0, 10.0).is_err());
        assert!(validate_cycling(27.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = validate_running(5.2, 24.0, -3.0).unwrap_err();
        match err {
            WorkoutError::Validation(msg) => assert!(msg.contains("cadence")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
