//! Configuration management for keytime.
//!
//! This module handles loading configuration from `~/.keytime/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, GeneralConfig, LoggingConfig, TrackerConfig};
