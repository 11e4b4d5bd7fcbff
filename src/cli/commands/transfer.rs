//! CSV export and import commands.

use std::path::{Path, PathBuf};

use chrono::Local;
use colored::Colorize;
use serde_json::json;

use super::sessions::cancelled;
use super::{confirm, today};
use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::core::Clock;
use crate::error::KeytimeError;
use crate::features::tracking::Tracker;
use crate::features::transfer::{default_filename, read_import, write_export, ImportReport};
use crate::output::{format_import_pretty, to_json};
use crate::storage::KeyValueStore;

/// Export every session to CSV.
///
/// Without `out`, writes a dated file under the exports directory.
///
/// # Errors
///
/// Returns an error if the store fails or the file cannot be written.
pub fn export<S: KeyValueStore, C: Clock>(
    tracker: &Tracker<S, C>,
    paths: &Paths,
    out: Option<PathBuf>,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    let sessions = tracker.sessions()?;
    let path = out.unwrap_or_else(|| paths.exports.join(default_filename(today(tracker))));
    write_export(&path, &sessions)?;

    match format {
        OutputFormat::Json => to_json(&json!({
            "status": "exported",
            "count": sessions.len(),
            "path": path,
        })),
        OutputFormat::Pretty => Ok(format!(
            "{} {} sessions to {}",
            "Exported".green(),
            sessions.len(),
            path.display()
        )),
    }
}

/// Read a CSV file and append its sessions after confirmation.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the store fails.
pub fn import<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    path: &Path,
    yes: bool,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    import_with(tracker, path, yes, format, confirm)
}

fn import_with<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    path: &Path,
    yes: bool,
    format: OutputFormat,
    ask: impl FnOnce(&str) -> Result<bool, KeytimeError>,
) -> Result<String, KeytimeError> {
    let report = read_import(path, &Local)?;

    if report.accepted() == 0 {
        return render(&report, None, format);
    }

    let question = format!(
        "Append {} sessions ({} rows skipped) to the existing log?",
        report.accepted(),
        report.skipped
    );
    if !yes && !ask(&question)? {
        return cancelled(format);
    }

    let total = tracker.import_sessions(report.sessions.clone())?;
    render(&report, Some(total), format)
}

fn render(report: &ImportReport, total: Option<usize>, format: OutputFormat) -> Result<String, KeytimeError> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "status": if total.is_some() { "imported" } else { "empty" },
            "accepted": report.accepted(),
            "skipped": report.skipped,
            "total": total,
        })),
        OutputFormat::Pretty => Ok(format_import_pretty(report, total)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{clock, record, tracker};
    use tempfile::TempDir;

    #[test]
    fn test_export_then_import_doubles_sessions() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path().to_path_buf());
        let clock = clock();
        let mut tracker = tracker(&clock);
        record(&mut tracker, &clock, 60);
        record(&mut tracker, &clock, 90);

        let output = export(&tracker, &paths, None, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let path = PathBuf::from(value["path"].as_str().unwrap());
        assert!(path.starts_with(&paths.exports));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("keytime-sessions-"));

        let original = tracker.sessions().unwrap();
        import(&mut tracker, &path, true, OutputFormat::Pretty).unwrap();

        let merged = tracker.sessions().unwrap();
        assert_eq!(merged.len(), 4);
        assert_eq!(merged[2..], original[..]);
    }

    #[test]
    fn test_declined_import_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.csv");
        let clock = clock();
        let mut tracker = tracker(&clock);
        record(&mut tracker, &clock, 60);
        write_export(&path, &tracker.sessions().unwrap()).unwrap();

        let output = import_with(&mut tracker, &path, false, OutputFormat::Pretty, |_| Ok(false)).unwrap();
        assert_eq!(output, "Cancelled.");
        assert_eq!(tracker.sessions().unwrap().len(), 1);
    }

    #[test]
    fn test_import_of_unreadable_rows_reports_counts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.csv");
        std::fs::write(&path, "a,b,c,d\nx,y,z,w\n").unwrap();
        let clock = clock();
        let mut tracker = tracker(&clock);

        let output = import_with(&mut tracker, &path, false, OutputFormat::Json, |_| {
            panic!("nothing to confirm")
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["accepted"], 0);
        assert_eq!(value["skipped"], 2);
    }
}
