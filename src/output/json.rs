//! JSON output formatting.

use serde::Serialize;
use serde_json::json;

use crate::error::KeytimeError;
use crate::features::shortcuts::Shortcut;
use crate::features::stats::{LogEntry, StatsReport};

/// Format shortcuts as JSON
///
/// # Errors
///
/// Returns `KeytimeError::Json` if serialization fails.
pub fn format_shortcuts_json(shortcuts: &[Shortcut]) -> Result<String, KeytimeError> {
    let output = json!({
        "count": shortcuts.len(),
        "items": shortcuts
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the session log as JSON
///
/// # Errors
///
/// Returns `KeytimeError::Json` if serialization fails.
pub fn format_log_json(entries: &[LogEntry]) -> Result<String, KeytimeError> {
    let total: f64 = entries.iter().map(|e| e.duration_seconds).sum();
    let output = json!({
        "count": entries.len(),
        "total_seconds": total,
        "items": entries
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a stats report as JSON
///
/// # Errors
///
/// Returns `KeytimeError::Json` if serialization fails.
pub fn format_stats_json(report: &StatsReport) -> Result<String, KeytimeError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `KeytimeError::Json` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, KeytimeError> {
    Ok(serde_json::to_string_pretty(value)?)
}
