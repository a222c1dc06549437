// Terminal implementations of the position, map, list and prompt interfaces

use crate::error::WorkoutError;
use crate::render::{
    Confirmation, Field, ListRenderer, MarkerHandle, MarkerRenderer, PositionProvider, display_fields,
};
use crate::workout::{Position, Workout, WorkoutKind};
use colored::{ColoredString, Colorize};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

/// Position from command-line coordinates, falling back to the configured home
#[derive(Debug, Clone, Default)]
pub struct CliPosition {
    coords: Option<(f64, f64)>,
    home: Option<Position>,
}

impl CliPosition {
    pub fn new(lat: Option<f64>, lng: Option<f64>, home: Option<Position>) -> Self {
        let coords = match (lat, lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        };
        Self { coords, home }
    }
}

impl PositionProvider for CliPosition {
    fn current_position(&mut self) -> Result<Position, WorkoutError> {
        match (self.coords, self.home) {
            (Some((lat, lng)), _) => Position::new(lat, lng),
            (None, Some(home)) => Ok(home),
            (None, None) => Err(WorkoutError::PositionUnavailable(
                "pass --lat and --lng or set `home` in the config file".to_string(),
            )),
        }
    }
}

/// Marker placed on the terminal "map"
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub handle: MarkerHandle,
    pub position: Position,
    pub kind: WorkoutKind,
    pub popup: String,
}

/// Keeps markers in memory and reports map movements on stdout
#[derive(Debug, Default)]
pub struct TerminalMap {
    next_handle: u64,
    markers: Vec<Marker>,
}

impl TerminalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl MarkerRenderer for TerminalMap {
    fn add_marker(&mut self, position: Position, kind: WorkoutKind, description: &str) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        let popup = format!("{} {}", kind.icon(), description);

        debug!(?handle, %position, popup = %popup, "Placed marker");
        self.markers.push(Marker {
            handle,
            position,
            kind,
            popup,
        });
        handle
    }

    fn remove_marker(&mut self, position: Position) {
        let before = self.markers.len();
        self.markers.retain(|m| m.position != position);
        debug!(%position, removed = before - self.markers.len(), "Removed markers");
    }

    fn focus(&mut self, position: Position, zoom: u8) {
        info!(%position, zoom, "Centering map");
        let popups: Vec<&str> = self
            .markers
            .iter()
            .filter(|m| m.position == position)
            .map(|m| m.popup.as_str())
            .collect();
        println!("📍 {} (zoom {}) {}", position, zoom, popups.join(" | ").dimmed());
    }
}

/// One displayed workout
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub id: String,
    pub kind: WorkoutKind,
    pub fields: Vec<(Field, String)>,
}

impl ListItem {
    pub fn value(&self, field: Field) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }
}

/// Workout list held in display order and printed on demand
#[derive(Debug, Default)]
pub struct TerminalList {
    items: Vec<ListItem>,
}

impl TerminalList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&ListItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn print(&self) {
        if self.items.is_empty() {
            println!("{}", "No workouts yet.".dimmed());
            return;
        }
        for item in &self.items {
            println!("{}", format_item(item));
        }
    }

    pub fn print_item(&self, id: &str) {
        if let Some(item) = self.item(id) {
            println!("{}", format_item(item));
        }
    }
}

impl ListRenderer for TerminalList {
    fn render(&mut self, workout: &Workout) {
        self.items.insert(
            0,
            ListItem {
                id: workout.id().to_string(),
                kind: workout.kind(),
                fields: display_fields(workout),
            },
        );
    }

    fn update_field(&mut self, id: &str, field: Field, value: &str) {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return;
        };
        match item.fields.iter_mut().find(|(f, _)| *f == field) {
            Some((_, v)) => *v = value.to_string(),
            None => item.fields.push((field, value.to_string())),
        }
    }

    fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    fn reorder(&mut self, ids: &[String]) {
        let mut items = std::mem::take(&mut self.items);
        for id in ids {
            if let Some(index) = items.iter().position(|item| &item.id == id) {
                self.items.push(items.remove(index));
            }
        }
        // Entries the caller did not mention keep their relative order at the end
        self.items.extend(items);
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

fn paint(kind: WorkoutKind, text: &str) -> ColoredString {
    match kind {
        WorkoutKind::Running => text.green().bold(),
        WorkoutKind::Cycling => text.yellow().bold(),
    }
}

fn field_icon(kind: WorkoutKind, field: Field) -> &'static str {
    match field {
        Field::Title => "",
        Field::Distance => kind.icon(),
        Field::Duration => "⏱",
        Field::Pace | Field::Speed => "⚡️",
        Field::Cadence => "🦶🏼",
        Field::ElevationGain => "⛰",
    }
}

/// Two-line rendering: title with id, then the measured and derived values
pub fn format_item(item: &ListItem) -> String {
    let title = item.value(Field::Title).unwrap_or_default();
    let details: Vec<String> = item
        .fields
        .iter()
        .filter(|(field, _)| *field != Field::Title)
        .map(|(field, value)| format!("{} {} {}", field_icon(item.kind, *field), value, field.unit()))
        .collect();

    format!(
        "{} {}\n    {}",
        paint(item.kind, title),
        format!("[{}]", item.id).dimmed(),
        details.join("  ")
    )
}

/// Yes/no prompt on stdin, or a fixed answer when `--yes` was given
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirmation {
    assume_yes: bool,
}

impl StdinConfirmation {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmation for StdinConfirmation {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}
