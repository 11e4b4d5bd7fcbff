//! Session log commands: list, delete one, clear all.

use chrono::Local;
use colored::Colorize;
use serde_json::json;

use super::{confirm, resolve_day};
use crate::cli::args::{LogArgs, OutputFormat};
use crate::core::{format_hms, Clock};
use crate::error::KeytimeError;
use crate::features::stats::session_log;
use crate::features::tracking::Tracker;
use crate::output::{format_log, to_json};
use crate::storage::KeyValueStore;

/// List sessions, newest first.
///
/// # Errors
///
/// Returns an error if the day is invalid or the store fails.
pub fn log<S: KeyValueStore, C: Clock>(
    tracker: &Tracker<S, C>,
    args: &LogArgs,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    let sessions = tracker.sessions()?;
    let mut entries = session_log(&sessions, &Local);

    let title = match &args.day {
        Some(expr) => {
            let day = resolve_day(tracker, expr)?;
            entries.retain(|e| e.date == day);
            format!("Sessions on {}", day.format("%Y-%m-%d"))
        },
        None => "Sessions".to_string(),
    };
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    format_log(&entries, &title, format)
}

/// Delete the session at `index`, asking first unless `yes`.
///
/// # Errors
///
/// Returns `NotFound` for an unknown index, or an error if the store fails.
pub fn delete<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    index: usize,
    yes: bool,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    delete_with(tracker, index, yes, format, confirm)
}

fn delete_with<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    index: usize,
    yes: bool,
    format: OutputFormat,
    ask: impl FnOnce(&str) -> Result<bool, KeytimeError>,
) -> Result<String, KeytimeError> {
    let sessions = tracker.sessions()?;
    let session = sessions
        .get(index)
        .ok_or_else(|| KeytimeError::NotFound(format!("Session #{index}")))?;

    let question = format!(
        "Delete session #{index} ({}, {}, {})?",
        session.category,
        session.start_time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        format_hms(session.duration_seconds)
    );
    if !yes && !ask(&question)? {
        return cancelled(format);
    }

    let removed = tracker.delete_session(index)?;
    match format {
        OutputFormat::Json => to_json(&json!({ "status": "deleted", "index": index, "session": removed })),
        OutputFormat::Pretty => Ok(format!(
            "{} session #{index} ({})",
            "Deleted".red(),
            removed.category
        )),
    }
}

/// Delete every session, asking first unless `yes`.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn clear<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    yes: bool,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    clear_with(tracker, yes, format, confirm)
}

fn clear_with<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    yes: bool,
    format: OutputFormat,
    ask: impl FnOnce(&str) -> Result<bool, KeytimeError>,
) -> Result<String, KeytimeError> {
    let count = tracker.sessions()?.len();
    if count == 0 {
        return match format {
            OutputFormat::Json => to_json(&json!({ "status": "cleared", "count": 0 })),
            OutputFormat::Pretty => Ok("No sessions to clear.".to_string()),
        };
    }

    if !yes && !ask(&format!("Delete all {count} sessions? This cannot be undone."))? {
        return cancelled(format);
    }

    let count = tracker.clear_sessions()?;
    match format {
        OutputFormat::Json => to_json(&json!({ "status": "cleared", "count": count })),
        OutputFormat::Pretty => Ok(format!("{} {count} sessions", "Cleared".red())),
    }
}

pub(super) fn cancelled(format: OutputFormat) -> Result<String, KeytimeError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "status": "cancelled" })),
        OutputFormat::Pretty => Ok("Cancelled.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{clock, record, tracker};

    #[test]
    fn test_log_newest_first_with_limit() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        record(&mut tracker, &clock, 60);
        record(&mut tracker, &clock, 120);
        record(&mut tracker, &clock, 180);

        let args = LogArgs {
            day: None,
            limit: Some(2),
        };
        let output = log(&tracker, &args, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["items"][0]["index"], 2);
        assert_eq!(value["items"][1]["index"], 1);
    }

    #[test]
    fn test_log_day_filter() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        record(&mut tracker, &clock, 60);

        let args = LogArgs {
            day: Some("yesterday".to_string()),
            limit: None,
        };
        let output = log(&tracker, &args, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 0);
    }

    #[test]
    fn test_delete_declined_is_noop() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        record(&mut tracker, &clock, 60);

        let output = delete_with(&mut tracker, 0, false, OutputFormat::Pretty, |_| Ok(false)).unwrap();
        assert_eq!(output, "Cancelled.");
        assert_eq!(tracker.sessions().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_confirmed() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        record(&mut tracker, &clock, 60);
        record(&mut tracker, &clock, 90);

        delete_with(&mut tracker, 0, false, OutputFormat::Pretty, |q| {
            assert!(q.starts_with("Delete session #0 (Reading"));
            Ok(true)
        })
        .unwrap();

        let sessions = tracker.sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!((sessions[0].duration_seconds - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_delete_unknown_index() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        let result = delete(&mut tracker, 4, true, OutputFormat::Pretty);
        assert!(matches!(result, Err(KeytimeError::NotFound(_))));
    }

    #[test]
    fn test_clear_declined_then_confirmed() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        record(&mut tracker, &clock, 60);
        record(&mut tracker, &clock, 60);

        clear_with(&mut tracker, false, OutputFormat::Pretty, |_| Ok(false)).unwrap();
        assert_eq!(tracker.sessions().unwrap().len(), 2);

        let output = clear(&mut tracker, true, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 2);
        assert!(tracker.sessions().unwrap().is_empty());
    }
}
