// Three-way cyclic sort over the rendered workout list

use crate::workout::WorkoutKind;
use tracing::{debug, warn};

/// One rendered list entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: String,
    pub kind: WorkoutKind,
}

impl ListEntry {
    pub fn new(id: impl Into<String>, kind: WorkoutKind) -> Self {
        Self { id: id.into(), kind }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Unsorted,
    CyclingFirst,
    RunningFirst,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Unsorted => SortMode::CyclingFirst,
            SortMode::CyclingFirst => SortMode::RunningFirst,
            SortMode::RunningFirst => SortMode::Unsorted,
        }
    }

    /// The kind placed first in this mode, if any
    pub fn target(self) -> Option<WorkoutKind> {
        match self {
            SortMode::Unsorted => None,
            SortMode::CyclingFirst => Some(WorkoutKind::Cycling),
            SortMode::RunningFirst => Some(WorkoutKind::Running),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Unsorted => write!(f, "original order"),
            SortMode::CyclingFirst => write!(f, "cycling first"),
            SortMode::RunningFirst => write!(f, "running first"),
        }
    }
}

/// Cycles the view through Unsorted -> CyclingFirst -> RunningFirst -> Unsorted.
///
/// The baseline ("original order") is what Unsorted restores. It is captured by
/// [`SortEngine::initialize`] and kept current as entries are rendered or
/// removed.
#[derive(Debug, Clone, Default)]
pub struct SortEngine {
    mode: SortMode,
    baseline: Option<Vec<String>>,
}

impl SortEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SortMode {
        self.mode
    }

    pub fn is_initialized(&self) -> bool {
        self.baseline.is_some()
    }

    /// Capture the current view as the original order. Only the first call counts.
    pub fn initialize(&mut self, view: &[ListEntry]) {
        if self.baseline.is_some() {
            warn!("Sort baseline already captured, ignoring");
            return;
        }
        debug!(count = view.len(), "Capturing sort baseline");
        self.baseline = Some(view.iter().map(|e| e.id.clone()).collect());
    }

    /// Record a newly rendered entry, which appears at the top of the list
    pub fn note_rendered(&mut self, id: &str) {
        if let Some(baseline) = self.baseline.as_mut() {
            baseline.insert(0, id.to_string());
        }
    }

    /// Drop a removed entry from the baseline
    pub fn forget(&mut self, id: &str) {
        if let Some(baseline) = self.baseline.as_mut() {
            baseline.retain(|b| b != id);
        }
    }

    /// Advance the mode and reorder `view` accordingly
    pub fn cycle(&mut self, view: &mut [ListEntry]) -> SortMode {
        if self.baseline.is_none() {
            debug!("Sort baseline not initialized, capturing current view");
            self.initialize(view);
        }

        self.mode = self.mode.next();

        match self.mode.target() {
            // Stable partition: the targeted kind first, source order kept within each group
            Some(target) => view.sort_by_key(|entry| entry.kind != target),
            None => {
                let baseline = self.baseline.as_deref().unwrap_or_default();
                view.sort_by_key(|entry| {
                    baseline
                        .iter()
                        .position(|id| *id == entry.id)
                        .unwrap_or(usize::MAX)
                });
            }
        }

        debug!(mode = ?self.mode, count = view.len(), "Sorted view");
        self.mode
    }
}
