// Ordered in-memory collection of workouts

use crate::workout::Workout;
use tracing::debug;

/// Workouts in insertion order
///
/// Ids are expected to be unique; `append` does not check, since ids are
/// generated at creation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutCollection {
    workouts: Vec<Workout>,
}

impl WorkoutCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Workout> {
        self.workouts.iter_mut().find(|w| w.id() == id)
    }

    /// Swap the workout with the given id in place.
    ///
    /// Does nothing and returns false when the id is absent.
    pub fn replace_at(&mut self, id: &str, workout: Workout) -> bool {
        match self.workouts.iter().position(|w| w.id() == id) {
            Some(index) => {
                self.workouts[index] = workout;
                true
            }
            None => {
                debug!(id, "replace_at: id not in collection");
                false
            }
        }
    }

    /// Remove and return the workout with the given id, keeping the order of the rest
    pub fn remove_by_id(&mut self, id: &str) -> Option<Workout> {
        let index = self.workouts.iter().position(|w| w.id() == id)?;
        Some(self.workouts.remove(index))
    }

    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

impl From<Vec<Workout>> for WorkoutCollection {
    fn from(workouts: Vec<Workout>) -> Self {
        Self { workouts }
    }
}
