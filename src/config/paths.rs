//! Path resolution for keytime configuration and data files.
//!
//! All keytime data is stored in `~/.keytime/` unless overridden:
//! - `config.yaml` - Main configuration file
//! - `keytime.db` - SQLite database holding shortcuts, sessions, preferences
//! - `logs/` - Rolling log files
//! - `exports/` - Default target for CSV exports

use std::path::PathBuf;

use crate::error::KeytimeError;

/// Paths to keytime configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.keytime/`
    pub root: PathBuf,
    /// Config file: `~/.keytime/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.keytime/keytime.db`
    pub database: PathBuf,
    /// Logs directory: `~/.keytime/logs/`
    pub logs: PathBuf,
    /// Exports directory: `~/.keytime/exports/`
    pub exports: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, KeytimeError> {
        let home = std::env::var("HOME").map_err(|_| {
            KeytimeError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".keytime")))
    }

    /// Resolve paths from an optional override directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is given and the home directory
    /// cannot be determined.
    pub fn resolve(root: Option<PathBuf>) -> Result<Self, KeytimeError> {
        root.map_or_else(Self::new, |root| Ok(Self::with_root(root)))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("keytime.db"),
            logs: root.join("logs"),
            exports: root.join("exports"),
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), KeytimeError> {
        for dir in [&self.root, &self.logs, &self.exports] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    KeytimeError::Config(format!(
                        "Failed to create directory {}: {e}",
                        dir.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}
