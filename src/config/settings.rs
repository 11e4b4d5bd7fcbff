//! Configuration settings for keytime.
//!
//! Settings are loaded from `~/.keytime/config.yaml`. User preferences that
//! the tracker itself toggles (milliseconds, sound, theme) live in the
//! key/value store instead, see `features::preferences`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::KeytimeError;
use crate::features::stats::DEFAULT_WINDOW_DAYS;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Tracker behaviour.
    pub tracker: TrackerConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Tracker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL that share links are appended to.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    /// Number of days in the statistics chart window.
    #[serde(default = "default_chart_days")]
    pub chart_days: u32,
    /// How often the TUI redraws while no timer is running, in seconds.
    #[serde(default = "default_idle_poll_seconds")]
    pub idle_poll_seconds: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Number of daily log files to keep.
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_share_base_url() -> String {
    "https://keytime.app/".to_string()
}

const fn default_chart_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

const fn default_idle_poll_seconds() -> u64 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_max_log_files() -> usize {
    5
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            share_base_url: default_share_base_url(),
            chart_days: default_chart_days(),
            idle_poll_seconds: default_idle_poll_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, KeytimeError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            KeytimeError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            KeytimeError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), KeytimeError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| KeytimeError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            KeytimeError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Apply the color setting to `colored`'s global override.
    pub fn apply_color(&self) {
        match self.general.color {
            ColorSetting::Auto => {},
            ColorSetting::Always => colored::control::set_override(true),
            ColorSetting::Never => colored::control::set_override(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.general.color, ColorSetting::Auto);
        assert_eq!(config.tracker.chart_days, 14);
        assert_eq!(config.tracker.idle_poll_seconds, 1);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_files, 5);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut config = Config::default();
        config.tracker.chart_days = 7;
        config.tracker.share_base_url = "https://example.org/kt".to_string();

        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();

        assert_eq!(loaded.tracker.chart_days, 7);
        assert_eq!(loaded.tracker.share_base_url, "https://example.org/kt");
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let partial_yaml = r#"
tracker:
  chart_days: 30
logging:
  level: debug
"#;
        std::fs::write(&config_path, partial_yaml).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(config.tracker.chart_days, 30);
        assert_eq!(config.logging.level, "debug");
        // Defaults fill the gaps
        assert_eq!(config.tracker.idle_poll_seconds, 1);
        assert_eq!(config.logging.max_files, 5);
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "tracker: [not, a, map]").unwrap();

        let err = Config::load_from_path(&config_path).unwrap_err();
        assert!(matches!(err, KeytimeError::Config(_)));
    }
}
