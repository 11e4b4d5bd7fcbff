//! Statistics command.

use chrono::Local;

use super::resolve_day;
use crate::cli::args::{OutputFormat, StatsArgs};
use crate::core::Clock;
use crate::error::KeytimeError;
use crate::features::stats::StatsReport;
use crate::features::tracking::Tracker;
use crate::output::format_stats;
use crate::storage::KeyValueStore;

/// Show totals for the chosen day plus the daily chart ending there.
///
/// # Errors
///
/// Returns an error if the day is invalid or the store fails.
pub fn stats<S: KeyValueStore, C: Clock>(
    tracker: &Tracker<S, C>,
    args: &StatsArgs,
    window_days: u32,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    let day = resolve_day(tracker, &args.day)?;
    let sessions = tracker.sessions()?;
    let categories = tracker.shortcuts().categories();

    let report = StatsReport::build(&sessions, day, window_days, &categories, &Local);
    format_stats(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{clock, record, tracker};

    #[test]
    fn test_stats_json_includes_registered_categories() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        record(&mut tracker, &clock, 1800);

        let args = StatsArgs {
            day: "today".to_string(),
        };
        let output = stats(&tracker, &args, 14, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["summary"]["count"], 1);
        assert_eq!(value["all_time"][0]["category"], "Reading");
        assert_eq!(value["grid"]["days"].as_array().unwrap().len(), 14);

        let series: Vec<&str> = value["grid"]["series"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["category"].as_str().unwrap())
            .collect();
        assert_eq!(series, vec!["Reading", "Work"]);
    }

    #[test]
    fn test_stats_pretty_empty_day() {
        colored::control::set_override(false);
        let clock = clock();
        let tracker = tracker(&clock);
        let args = StatsArgs {
            day: "2020-01-01".to_string(),
        };
        let output = stats(&tracker, &args, 7, OutputFormat::Pretty).unwrap();
        assert!(output.contains("Stats for 2020-01-01"));
        assert!(output.contains("0 sessions"));
    }

    #[test]
    fn test_stats_bad_day() {
        let clock = clock();
        let tracker = tracker(&clock);
        let args = StatsArgs {
            day: "nope".to_string(),
        };
        assert!(stats(&tracker, &args, 14, OutputFormat::Pretty).is_err());
    }
}
