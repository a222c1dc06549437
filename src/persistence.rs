// Save and load the workout collection as a JSON array under one key

use crate::collection::WorkoutCollection;
use crate::store::KeyValueStore;
use crate::workout::{RawWorkout, Workout};
use eyre::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

pub const DEFAULT_KEY: &str = "workouts";

/// Persistence adapter for a [`WorkoutCollection`]
pub struct Persistence<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize every workout, in order, replacing whatever was stored
    pub fn save(&mut self, collection: &WorkoutCollection) -> Result<()> {
        let raws: Vec<RawWorkout> = collection.all().iter().map(Workout::to_raw).collect();
        let json = serde_json::to_string(&raws).context("Failed to serialize workouts")?;
        self.store.set(&self.key, &json)?;

        debug!(key = %self.key, count = raws.len(), "Saved workouts");
        Ok(())
    }

    /// Load the stored collection.
    ///
    /// Missing or unreadable data yields an empty collection. Entries that do
    /// not describe a valid workout are skipped.
    pub fn load(&self) -> WorkoutCollection {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = %self.key, error = ?e, "Failed to read stored workouts, starting empty");
                return WorkoutCollection::new();
            }
        };

        let mut workouts = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let raw: RawWorkout = match serde_json::from_value(entry) {
                Ok(r) => r,
                Err(e) => {
                    warn!(key = %self.key, index, error = ?e, "Failed to parse workout, skipping");
                    continue;
                }
            };

            match Workout::from_raw(raw) {
                Ok(workout) => workouts.push(workout),
                Err(e) => warn!(key = %self.key, index, error = %e, "Invalid workout, skipping"),
            }
        }

        info!(key = %self.key, count = workouts.len(), "Loaded workouts");
        WorkoutCollection::from(workouts)
    }

    /// Remove one workout from storage by reading, filtering and rewriting the
    /// stored array. Other entries are written back untouched.
    pub fn remove_one(&mut self, id: &str) -> Result<()> {
        let entries = self.read_entries()?;
        let before = entries.len();

        let remaining: Vec<Value> = entries
            .into_iter()
            .filter(|entry| entry.get("id").and_then(|v| v.as_str()) != Some(id))
            .collect();

        let json = serde_json::to_string(&remaining).context("Failed to serialize workouts")?;
        self.store.set(&self.key, &json)?;

        debug!(key = %self.key, id, removed = before - remaining.len(), "Removed workout from storage");
        Ok(())
    }

    /// Drop all stored workouts
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.key)?;
        info!(key = %self.key, "Cleared stored workouts");
        Ok(())
    }

    fn read_entries(&self) -> Result<Vec<Value>> {
        match self.store.get(&self.key)? {
            Some(json) => serde_json::from_str(&json).context("Stored workouts are not a JSON array"),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SqliteStore};
    use crate::workout::{Position, WorkoutKind};
    use tempfile::TempDir;

    fn sample() -> WorkoutCollection {
        let pos = Position::new(39.0, -12.0).unwrap();
        let mut collection = WorkoutCollection::new();
        collection.append(Workout::running(pos, 5.2, 24.0, 178.0));
        collection.append(Workout::cycling(Position::new(38.7, -9.1).unwrap(), 27.0, 95.0, 523.0));
        collection.append(Workout::cycling(pos, 12.0, 40.0, -15.0));
        collection
    }

    fn measured(collection: &WorkoutCollection) -> Vec<(String, WorkoutKind, Position, f64, f64, f64)> {
        collection
            .all()
            .iter()
            .map(|w| {
                (
                    w.id().to_string(),
                    w.kind(),
                    w.position(),
                    w.distance_km(),
                    w.duration_min(),
                    w.activity().value(),
                )
            })
            .collect()
    }

    #[test]
    fn test_load_empty_store() {
        let persistence = Persistence::new(MemoryStore::new());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let collection = sample();

        {
            let mut persistence = Persistence::new(SqliteStore::open(temp.path()).unwrap());
            persistence.save(&collection).unwrap();
        }

        let persistence = Persistence::new(SqliteStore::open(temp.path()).unwrap());
        let loaded = persistence.load();
        assert_eq!(measured(&loaded), measured(&collection));
        assert_eq!(loaded.all()[0].metric(), collection.all()[0].metric());
        assert_eq!(loaded.all()[1].description(), collection.all()[1].description());
    }

    #[test]
    fn test_saved_shape_is_flat_array() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save(&sample()).unwrap();

        let json = persistence.store().get(DEFAULT_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["type"], "running");
        assert_eq!(entries[0]["cadence"], 178.0);
        assert_eq!(entries[1]["type"], "cycling");
        assert_eq!(entries[1]["elevationGain"], 523.0);
        assert_eq!(entries[1]["coords"][0], 38.7);
    }

    #[test]
    fn test_load_malformed_json_is_empty() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_KEY, "{not json").unwrap();
        let persistence = Persistence::new(store);
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_load_skips_bad_entries() {
        let mut store = MemoryStore::new();
        store
            .set(
                DEFAULT_KEY,
                r#"[
                    {"id":"a","date":"2024-04-05T10:00:00Z","type":"running","coords":[39,-12],"distance":5,"duration":25,"cadence":170},
                    {"id":"b","type":"swimming"},
                    {"id":"c","date":"2024-04-06T10:00:00Z","type":"cycling","coords":[39,-12],"distance":20,"duration":60},
                    {"id":"d","date":"2024-04-07T10:00:00Z","type":"cycling","coords":[39,-12],"distance":20,"duration":60,"elevationGain":0}
                ]"#,
            )
            .unwrap();

        let loaded = Persistence::new(store).load();
        let ids: Vec<&str> = loaded.all().iter().map(|w| w.id()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn test_load_skips_out_of_range_coords() {
        let mut store = MemoryStore::new();
        store
            .set(
                DEFAULT_KEY,
                r#"[
                    {"id":"a","date":"2024-04-05T10:00:00Z","type":"running","coords":[999,-999],"distance":5,"duration":25,"cadence":170},
                    {"id":"b","date":"2024-04-06T10:00:00Z","type":"running","coords":[39,-12],"distance":5,"duration":25,"cadence":170}
                ]"#,
            )
            .unwrap();

        let loaded = Persistence::new(store).load();
        let ids: Vec<&str> = loaded.all().iter().map(|w| w.id()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_remove_one() {
        let collection = sample();
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save(&collection).unwrap();

        let target = collection.all()[1].id().to_string();
        persistence.remove_one(&target).unwrap();

        let loaded = persistence.load();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.find_by_id(&target).is_none());
        assert_eq!(loaded.all()[0].id(), collection.all()[0].id());
        assert_eq!(loaded.all()[1].id(), collection.all()[2].id());
    }

    #[test]
    fn test_remove_one_keeps_unknown_fields() {
        let mut store = MemoryStore::new();
        store
            .set(
                DEFAULT_KEY,
                r#"[{"id":"a","note":"keep me"},{"id":"b","note":"drop me"}]"#,
            )
            .unwrap();
        let mut persistence = Persistence::new(store);

        persistence.remove_one("b").unwrap();

        let json = persistence.store().get(DEFAULT_KEY).unwrap().unwrap();
        assert_eq!(json, r#"[{"id":"a","note":"keep me"}]"#);
    }

    #[test]
    fn test_remove_one_missing_id_leaves_entries() {
        let collection = sample();
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save(&collection).unwrap();

        persistence.remove_one("missing").unwrap();
        assert_eq!(measured(&persistence.load()), measured(&collection));
    }

    #[test]
    fn test_clear() {
        let mut persistence = Persistence::with_key(MemoryStore::new(), "other");
        persistence.save(&sample()).unwrap();
        assert!(persistence.store().get("other").unwrap().is_some());

        persistence.clear().unwrap();
        assert!(persistence.store().get("other").unwrap().is_none());
        assert!(persistence.load().is_empty());
    }
}
