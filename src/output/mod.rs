//! Output formatting for keytime.
//!
//! Every listing has a colored text form and a JSON form.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::KeytimeError;
use crate::features::shortcuts::Shortcut;
use crate::features::stats::{LogEntry, StatsReport};

pub use json::*;
pub use pretty::*;

/// Format shortcuts based on output format
///
/// # Errors
///
/// Returns `KeytimeError::Json` if JSON serialization fails.
pub fn format_shortcuts(shortcuts: &[Shortcut], format: OutputFormat) -> Result<String, KeytimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_shortcuts_pretty(shortcuts)),
        OutputFormat::Json => format_shortcuts_json(shortcuts),
    }
}

/// Format the session log based on output format
///
/// # Errors
///
/// Returns `KeytimeError::Json` if JSON serialization fails.
pub fn format_log(entries: &[LogEntry], title: &str, format: OutputFormat) -> Result<String, KeytimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_log_pretty(entries, title)),
        OutputFormat::Json => format_log_json(entries),
    }
}

/// Format a stats report based on output format
///
/// # Errors
///
/// Returns `KeytimeError::Json` if JSON serialization fails.
pub fn format_stats(report: &StatsReport, format: OutputFormat) -> Result<String, KeytimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_stats_pretty(report)),
        OutputFormat::Json => format_stats_json(report),
    }
}
