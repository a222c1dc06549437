// Domain errors for workout creation and editing

/// Errors surfaced by the workout core.
///
/// Storage and I/O failures are not represented here; they travel as
/// `eyre::Report` from the store layer and are logged by the controller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkoutError {
    /// Non-finite, non-positive or out-of-range input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Update/delete/focus referencing an id absent from the collection
    #[error("Workout not found: {0}")]
    NotFound(String),

    /// The position provider could not supply a location
    #[error("Could not get your position: {0}")]
    PositionUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WorkoutError::Validation("distance must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid input: distance must be positive");

        let err = WorkoutError::Validation("latitude out of range: 100".to_string());
        assert_eq!(err.to_string(), "Invalid input: latitude out of range: 100");

        let err = WorkoutError::PositionUnavailable("no fix".to_string());
        assert_eq!(err.to_string(), "Could not get your position: no fix");

        let err = WorkoutError::NotFound("abc".to_string());
        assert_eq!(err.to_string(), "Workout not found: abc");
    }
}
