//! Key/value persistence port.
//!
//! Everything keytime persists is a text value under a string key. The
//! tracker only talks to [`KeyValueStore`], so it runs the same against the
//! `SQLite` store and the in-memory store used by tests.

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::KeytimeError;

/// A string-keyed text store.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, KeytimeError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), KeytimeError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), KeytimeError>;
}

/// Store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeytimeError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KeytimeError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), KeytimeError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by the `kv` table of the local database.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Wrap an open database.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeytimeError> {
        self.db
            .connection()
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(|e| KeytimeError::Database(format!("Failed to read key {key}: {e}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KeytimeError> {
        self.db
            .connection()
            .execute(
                r"INSERT INTO kv (key, value, updated_at)
                  VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                  ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![key, value],
            )
            .map_err(|e| KeytimeError::Database(format!("Failed to write key {key}: {e}")))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), KeytimeError> {
        self.db
            .connection()
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(|e| KeytimeError::Database(format!("Failed to remove key {key}: {e}")))?;
        Ok(())
    }
}
