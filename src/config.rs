// Configuration loaded from YAML

use crate::persistence::DEFAULT_KEY;
use crate::store::SqliteStore;
use crate::workout::{EditDatePolicy, Position};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zoom level used when centering the map on a workout
    pub map_zoom: u8,
    /// Key the workout array is stored under
    pub storage_key: String,
    /// Whether editing a workout keeps its creation date
    pub edit_date_policy: EditDatePolicy,
    /// Fallback position for new workouts when none is given
    pub home: Option<Position>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_zoom: 13,
            storage_key: DEFAULT_KEY.to_string(),
            edit_date_policy: EditDatePolicy::default(),
            home: None,
        }
    }
}

impl Config {
    /// `<config dir>/workoutlog/config.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("workoutlog").join("config.yml"))
    }

    /// Load from an explicit path, which must exist, or from the default
    /// location if a file is there. Falls back to defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", path.display()))?;
        info!(path = ?path, "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content).context("Failed to parse YAML config")?;
        SqliteStore::validate_key(&config.storage_key).context("Invalid storage_key in config")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.map_zoom, 13);
        assert_eq!(config.storage_key, "workouts");
        assert_eq!(config.edit_date_policy, EditDatePolicy::Preserve);
        assert!(config.home.is_none());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = Config::from_yaml("edit_date_policy: restamp\nhome: [39.0, -12.0]\n").unwrap();
        assert_eq!(config.edit_date_policy, EditDatePolicy::Restamp);
        assert_eq!(config.home, Some(Position { lat: 39.0, lng: -12.0 }));
        assert_eq!(config.map_zoom, 13);
        assert_eq!(config.storage_key, "workouts");
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(Config::from_yaml("edit_date_policy: sometimes\n").is_err());
    }

    #[test]
    fn test_from_yaml_rejects_out_of_range_home() {
        assert!(Config::from_yaml("home: [200.0, 500.0]\n").is_err());
        assert!(Config::from_yaml("home: [39.0, -181.0]\n").is_err());
    }

    #[test]
    fn test_from_yaml_rejects_bad_storage_key() {
        assert!(Config::from_yaml("storage_key: my workouts\n").is_err());
        assert!(Config::from_yaml("storage_key: \"\"\n").is_err());
        assert_eq!(Config::from_yaml("storage_key: runs_2024\n").unwrap().storage_key, "runs_2024");
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "map_zoom: 15\nstorage_key: runs\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.map_zoom, 15);
        assert_eq!(config.storage_key, "runs");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(&temp.path().join("nope.yml"))).is_err());
    }
}
