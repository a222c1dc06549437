// Durable key-value storage backed by SQLite

use eyre::{Context, Result, eyre};
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CURRENT_VERSION: u32 = 1;

/// Minimal durable key-value store: one string value per key
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Key-value store persisted in a SQLite database
pub struct SqliteStore {
    base_path: PathBuf,
    db: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given path
    ///
    /// The store will be created in a `.workoutlog` subdirectory of the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().join(".workoutlog");

        fs::create_dir_all(&base_path).context("Failed to create store directory")?;

        let db_path = base_path.join("workoutlog.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let store = Self { base_path, db };

        store.create_schema()?;
        store.create_gitignore()?;
        store.write_version()?;

        debug!(path = ?store.base_path, "Opened store");
        Ok(store)
    }

    /// Get the base path of this store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn create_gitignore(&self) -> Result<()> {
        let gitignore_path = self.base_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "workoutlog.db\nworkoutlog.db-shm\nworkoutlog.db-wal\n")?;
        }
        Ok(())
    }

    fn write_version(&self) -> Result<()> {
        let version_path = self.base_path.join(".version");
        if !version_path.exists() {
            fs::write(version_path, CURRENT_VERSION.to_string())?;
        }
        Ok(())
    }

    /// Keys are 1-64 characters of alphanumerics, `_` or `-`
    pub fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(eyre!("Storage key cannot be empty"));
        }
        if key.len() > 64 {
            return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
        }
        if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-)", key));
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::validate_key(key)?;

        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .context("Failed to read key from database")?;

        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;

        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, now_ms()],
            )
            .context("Failed to write key to database")?;

        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        Self::validate_key(key)?;

        self.db
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .context("Failed to delete key from database")?;

        Ok(())
    }
}

/// Volatile store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// Helper function for timestamps
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_open_creates_directory() {
        let temp = TempDir::new().unwrap();

        let _store = SqliteStore::open(temp.path()).unwrap();
        let store_path = temp.path().join(".workoutlog");
        assert!(store_path.exists());
        assert!(store_path.join("workoutlog.db").exists());
        assert!(store_path.join(".gitignore").exists());
        assert!(store_path.join(".version").exists());
    }

    #[test]
    fn test_sqlite_get_set_remove() {
        let temp = TempDir::new().unwrap();
        let mut store = SqliteStore::open(temp.path()).unwrap();

        assert_eq!(store.get("workouts").unwrap(), None);

        store.set("workouts", "[]").unwrap();
        assert_eq!(store.get("workouts").unwrap().as_deref(), Some("[]"));

        store.set("workouts", "[1]").unwrap();
        assert_eq!(store.get("workouts").unwrap().as_deref(), Some("[1]"));

        store.remove("workouts").unwrap();
        assert_eq!(store.get("workouts").unwrap(), None);

        // Removing again is fine
        store.remove("workouts").unwrap();
    }

    #[test]
    fn test_sqlite_survives_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut store = SqliteStore::open(temp.path()).unwrap();
            store.set("workouts", "[\"kept\"]").unwrap();
        }

        let store = SqliteStore::open(temp.path()).unwrap();
        assert_eq!(store.get("workouts").unwrap().as_deref(), Some("[\"kept\"]"));
    }

    #[test]
    fn test_validation_key() {
        assert!(SqliteStore::validate_key("workouts").is_ok());
        assert!(SqliteStore::validate_key("my-workouts_2").is_ok());

        assert!(SqliteStore::validate_key("").is_err());
        assert!(SqliteStore::validate_key("bad/key").is_err());
        assert!(SqliteStore::validate_key("my workouts").is_err());
        assert!(SqliteStore::validate_key(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
