// Application context: owns the workouts and coordinates every user action

use crate::collection::WorkoutCollection;
use crate::config::Config;
use crate::error::WorkoutError;
use crate::persistence::Persistence;
use crate::render::{Confirmation, ListRenderer, MarkerHandle, MarkerRenderer, PositionProvider, display_fields};
use crate::sort::{ListEntry, SortEngine, SortMode};
use crate::store::KeyValueStore;
use crate::workout::{Position, Workout, WorkoutKind};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const DELETE_ALL_PROMPT: &str = "Are you sure you want to delete all elements?";

/// Form input for a new workout
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutInput {
    Running {
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    },
    Cycling {
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    },
}

impl WorkoutInput {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            WorkoutInput::Running { .. } => WorkoutKind::Running,
            WorkoutInput::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub fn validate(&self) -> Result<(), WorkoutError> {
        match *self {
            WorkoutInput::Running {
                distance_km,
                duration_min,
                cadence_spm,
            } => WorkoutKind::Running.validate(distance_km, duration_min, cadence_spm),
            WorkoutInput::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            } => WorkoutKind::Cycling.validate(distance_km, duration_min, elevation_gain_m),
        }
    }

    fn build(self, position: Position) -> Workout {
        match self {
            WorkoutInput::Running {
                distance_km,
                duration_min,
                cadence_spm,
            } => Workout::running(position, distance_km, duration_min, cadence_spm),
            WorkoutInput::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            } => Workout::cycling(position, distance_km, duration_min, elevation_gain_m),
        }
    }
}

/// Outcome of [`AppContext::delete_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAll {
    Cancelled,
    Reloaded,
}

/// Owns the workout collection, its persisted mirror, the sort state and the
/// rendered view. Every mutation goes through here.
pub struct AppContext<S: KeyValueStore, M: MarkerRenderer, L: ListRenderer> {
    config: Config,
    collection: WorkoutCollection,
    persistence: Persistence<S>,
    sort: SortEngine,
    /// Rendered list order, top first
    view: Vec<ListEntry>,
    markers: HashMap<String, MarkerHandle>,
    map: M,
    list: L,
}

impl<S: KeyValueStore, M: MarkerRenderer, L: ListRenderer> AppContext<S, M, L> {
    /// Load stored workouts, render them and capture the sort baseline
    pub fn start(config: Config, store: S, map: M, list: L) -> Self {
        let persistence = Persistence::with_key(store, config.storage_key.clone());

        let mut app = Self {
            config,
            collection: WorkoutCollection::new(),
            persistence,
            sort: SortEngine::new(),
            view: Vec::new(),
            markers: HashMap::new(),
            map,
            list,
        };
        app.reload();
        app
    }

    fn reload(&mut self) {
        self.collection = self.persistence.load();
        self.view.clear();
        self.markers.clear();
        self.sort = SortEngine::new();

        for workout in self.collection.all() {
            let handle = self
                .map
                .add_marker(workout.position(), workout.kind(), &workout.description());
            self.markers.insert(workout.id().to_string(), handle);
            self.list.render(workout);
            self.view.insert(0, ListEntry::new(workout.id(), workout.kind()));
        }

        self.sort.initialize(&self.view);
        info!(count = self.collection.len(), "Application state loaded");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn collection(&self) -> &WorkoutCollection {
        &self.collection
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn view(&self) -> &[ListEntry] {
        &self.view
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort.mode()
    }

    pub fn marker(&self, id: &str) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn list(&self) -> &L {
        &self.list
    }

    /// Validate the input, place it at the provider's position, then record,
    /// render and save it.
    pub fn new_workout<P: PositionProvider>(
        &mut self,
        provider: &mut P,
        input: WorkoutInput,
    ) -> Result<Workout, WorkoutError> {
        input.validate()?;
        let position = provider.current_position()?;

        let workout = input.build(position);
        info!(id = workout.id(), kind = %workout.kind(), "New workout");

        self.collection.append(workout.clone());

        let handle = self
            .map
            .add_marker(workout.position(), workout.kind(), &workout.description());
        self.markers.insert(workout.id().to_string(), handle);

        self.list.render(&workout);
        self.view.insert(0, ListEntry::new(workout.id(), workout.kind()));
        self.sort.note_rendered(workout.id());

        self.save();
        Ok(workout)
    }

    /// Center the map on a workout and count the interaction.
    ///
    /// Unknown ids are ignored.
    pub fn focus(&mut self, id: &str) -> Option<Position> {
        let workout = match self.lookup_mut(id) {
            Ok(w) => w,
            Err(e) => {
                debug!(error = %e, "focus: ignoring");
                return None;
            }
        };

        workout.click();
        let position = workout.position();

        self.map.focus(position, self.config.map_zoom);
        self.save();
        Some(position)
    }

    /// Replace a workout's measured fields.
    ///
    /// `kind_value` is the cadence for running and the elevation gain for
    /// cycling. Returns `Ok(None)` when the id is unknown.
    pub fn update(
        &mut self,
        id: &str,
        distance_km: f64,
        duration_min: f64,
        kind_value: f64,
    ) -> Result<Option<Workout>, WorkoutError> {
        let current = match self.lookup(id) {
            Ok(w) => w,
            Err(e) => {
                debug!(error = %e, "update: ignoring");
                return Ok(None);
            }
        };

        current.kind().validate(distance_km, duration_min, kind_value)?;
        let updated = current.edited(distance_km, duration_min, kind_value, self.config.edit_date_policy);

        self.collection.replace_at(id, updated.clone());

        for (field, value) in display_fields(&updated) {
            self.list.update_field(id, field, &value);
        }

        self.save();
        info!(id, "Updated workout");
        Ok(Some(updated))
    }

    /// Remove a workout from the list, the map and storage.
    ///
    /// Returns `None` when the id is unknown. A storage failure is logged and
    /// the in-memory removal stands.
    pub fn delete(&mut self, id: &str) -> Option<Workout> {
        let removed = match self.collection.remove_by_id(id) {
            Some(w) => w,
            None => {
                debug!(id, "delete: workout not found, ignoring");
                return None;
            }
        };

        self.list.remove(id);
        self.view.retain(|entry| entry.id != id);
        self.sort.forget(id);

        self.map.remove_marker(removed.position());
        self.markers.remove(id);

        if let Err(e) = self.persistence.remove_one(id) {
            warn!(id, error = ?e, "Failed to remove workout from storage");
        }

        info!(id, "Deleted workout");
        Some(removed)
    }

    /// Ask for confirmation, then wipe storage and rebuild the whole state from empty
    pub fn delete_all<C: Confirmation>(&mut self, confirmation: &mut C) -> DeleteAll {
        if !confirmation.confirm(DELETE_ALL_PROMPT) {
            debug!("delete_all: cancelled");
            return DeleteAll::Cancelled;
        }

        if let Err(e) = self.persistence.clear() {
            warn!(error = ?e, "Failed to clear stored workouts");
        }

        for workout in self.collection.all() {
            self.map.remove_marker(workout.position());
        }
        self.list.clear();

        self.reload();
        DeleteAll::Reloaded
    }

    /// Advance the cyclic sort and reorder the list
    pub fn sort(&mut self) -> SortMode {
        let mode = self.sort.cycle(&mut self.view);
        let ids: Vec<String> = self.view.iter().map(|entry| entry.id.clone()).collect();
        self.list.reorder(&ids);
        mode
    }

    fn lookup(&self, id: &str) -> Result<&Workout, WorkoutError> {
        self.collection
            .find_by_id(id)
            .ok_or_else(|| WorkoutError::NotFound(id.to_string()))
    }

    fn lookup_mut(&mut self, id: &str) -> Result<&mut Workout, WorkoutError> {
        self.collection
            .find_by_id_mut(id)
            .ok_or_else(|| WorkoutError::NotFound(id.to_string()))
    }

    fn save(&mut self) {
        if let Err(e) = self.persistence.save(&self.collection) {
            warn!(error = ?e, "Failed to save workouts");
        }
    }
}
