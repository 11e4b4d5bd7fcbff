//! Schema migrations for the keytime database.
//!
//! `PRAGMA user_version` records how many steps of `MIGRATIONS` have been
//! applied. Opening a database applies the rest in order.

use rusqlite::Connection;

use crate::error::KeytimeError;

/// Schema steps, oldest first. Step `n` upgrades version `n` to `n + 1`.
const MIGRATIONS: &[&str] = &[
    // v1: every persisted value is a text blob under a string key.
    r"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );
    ",
];

/// Schema version a fully migrated database reports.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const LATEST_VERSION: i32 = MIGRATIONS.len() as i32;

/// Read the schema version; 0 for a new database.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn get_version(conn: &Connection) -> Result<i32, KeytimeError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| KeytimeError::Database(format!("Failed to read schema version: {e}")))
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns an error if the database is newer than this build or a step fails.
pub fn run(conn: &Connection) -> Result<(), KeytimeError> {
    let current = get_version(conn)?;
    if current > LATEST_VERSION {
        return Err(KeytimeError::Database(format!(
            "Database schema v{current} is newer than supported v{LATEST_VERSION}"
        )));
    }

    for (step, sql) in (current..).zip(MIGRATIONS.iter().skip(usize::try_from(current).unwrap_or(0))) {
        apply_step(conn, step + 1, sql)?;
    }

    Ok(())
}

/// Run one step and bump the version in a single transaction.
///
/// A failing step is rolled back, leaving the connection usable.
fn apply_step(conn: &Connection, version: i32, sql: &str) -> Result<(), KeytimeError> {
    tracing::debug!(version, "applying schema migration");
    let failed = |e: rusqlite::Error| KeytimeError::Database(format!("Migration to v{version} failed: {e}"));

    let tx = conn.unchecked_transaction().map_err(failed)?;
    tx.execute_batch(&format!("{sql}\nPRAGMA user_version = {version};"))
        .map_err(failed)?;
    tx.commit().map_err(failed)
}
