//! `SQLite` connection for the key/value store.
//!
//! The file lives at `~/.keytime/keytime.db`. The TUI and one-off CLI
//! commands may have it open at the same time, so writers wait briefly on a
//! lock instead of failing.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::Paths;
use crate::error::KeytimeError;

use super::migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// A migrated database connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `keytime.db` under `paths`, creating directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open(paths: &Paths) -> Result<Self, KeytimeError> {
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open a database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, KeytimeError> {
        let conn = Connection::open(path)
            .map_err(|e| KeytimeError::Database(format!("Failed to open {}: {e}", path.display())))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| KeytimeError::Database(format!("Failed to set busy timeout: {e}")))?;

        tracing::debug!(path = %path.display(), "database opened");
        Self::prepare(conn)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if migration fails.
    pub fn open_in_memory() -> Result<Self, KeytimeError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| KeytimeError::Database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, KeytimeError> {
        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    /// Schema version of the open database.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, KeytimeError> {
        migrations::get_version(&self.conn)
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations::LATEST_VERSION;

    #[test]
    fn test_in_memory_is_migrated() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), LATEST_VERSION);
    }

    #[test]
    fn test_open_creates_data_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(temp.path().join("home"));

        Database::open(&paths).unwrap();
        assert!(paths.database.exists());
        assert!(paths.logs.is_dir());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("keytime.db");

        Database::open_at(&path)
            .unwrap()
            .connection()
            .execute("INSERT INTO kv (key, value) VALUES ('hasVisited', 'true')", [])
            .unwrap();

        let db = Database::open_at(&path).unwrap();
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
