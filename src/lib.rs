// WorkoutLog - running and cycling log with map markers, editing and cyclic sorting

pub mod app;
pub mod collection;
pub mod config;
pub mod error;
pub mod metric;
pub mod persistence;
pub mod render;
pub mod sort;
pub mod store;
pub mod terminal;
pub mod workout;

// Re-export main types for convenience
pub use app::{AppContext, DeleteAll, WorkoutInput};
pub use collection::WorkoutCollection;
pub use config::Config;
pub use error::WorkoutError;
pub use persistence::Persistence;
pub use render::{Confirmation, Field, ListRenderer, MarkerHandle, MarkerRenderer, PositionProvider};
pub use sort::{ListEntry, SortEngine, SortMode};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use workout::{Activity, EditDatePolicy, Metric, Position, RawWorkout, Workout, WorkoutKind};
