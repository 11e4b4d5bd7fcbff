//! CSV import and export of the session log.
//!
//! Exports are spreadsheet-friendly: a UTF-8 BOM, a Korean header row and
//! every field double-quoted. Imports are lenient about what they accept
//! and silently drop rows they cannot read.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::Serialize;

use crate::error::KeytimeError;
use crate::features::tracking::Session;

/// Byte order mark written at the start of every export.
pub const BOM: char = '\u{feff}';

/// Column titles: start time, end time, category, duration (seconds).
pub const HEADER: [&str; 4] = ["시작 시간", "종료 시간", "카테고리", "소요 시간(초)"];

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// File name for an export made on `date`.
#[must_use]
pub fn default_filename(date: NaiveDate) -> String {
    format!("keytime-sessions-{}.csv", date.format("%Y-%m-%d"))
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Write the BOM, header and one row per session to `out`.
fn write_sessions<W: Write>(mut out: W, sessions: &[Session]) -> Result<W, KeytimeError> {
    let mut bom = [0; 3];
    out.write_all(BOM.encode_utf8(&mut bom).as_bytes())?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(HEADER)?;
    for s in sessions {
        writer.write_record([
            timestamp(&s.start_time),
            timestamp(&s.end_time),
            s.category.clone(),
            s.duration_seconds.to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| KeytimeError::Io(e.into_error()))
}

/// Render sessions as CSV text, BOM included.
///
/// # Errors
///
/// Returns an error if a record cannot be written.
pub fn export_csv(sessions: &[Session]) -> Result<String, KeytimeError> {
    let bytes = write_sessions(Vec::new(), sessions)?;
    String::from_utf8(bytes).map_err(|e| KeytimeError::Parse(format!("UTF-8 error: {e}")))
}

/// Write an export to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_export(path: &Path, sessions: &[Session]) -> Result<(), KeytimeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_sessions(File::create(path)?, sessions)?.sync_all()?;
    tracing::info!(path = %path.display(), count = sessions.len(), "sessions exported");
    Ok(())
}

/// Outcome of reading a CSV file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    /// Rows that parsed, in file order.
    pub sessions: Vec<Session>,
    /// Data rows that were dropped.
    pub skipped: usize,
}

impl ImportReport {
    /// Number of accepted rows.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.sessions.len()
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

fn parse_timestamp<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Some(at.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(input, LOCAL_FORMAT).ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}

fn parse_row<Tz: TimeZone>(record: &StringRecord, tz: &Tz) -> Option<Session> {
    let mut fields = record.iter();
    let (start, end, category, duration) = (fields.next()?, fields.next()?, fields.next()?, fields.next()?);
    let duration: f64 = duration.trim().parse().ok()?;
    if !duration.is_finite() || duration < 0.0 {
        return None;
    }

    Some(Session {
        category: category.to_string(),
        start_time: parse_timestamp(start, tz)?,
        end_time: parse_timestamp(end, tz)?,
        duration_seconds: duration,
    })
}

/// Parse CSV text. Local timestamps are read in `tz`.
///
/// A first row starting with the header title is skipped, blank rows are
/// ignored and every other row that cannot be read counts as skipped.
pub fn parse_csv<Tz: TimeZone>(text: &str, tz: &Tz) -> ImportReport {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut report = ImportReport {
        sessions: Vec::new(),
        skipped: 0,
    };
    for (row, result) in reader.records().enumerate() {
        let Ok(record) = result else {
            report.skipped += 1;
            continue;
        };
        if row == 0 && record.get(0).is_some_and(|f| f.trim() == HEADER[0]) {
            continue;
        }
        if is_blank(&record) {
            continue;
        }
        match parse_row(&record, tz) {
            Some(session) => report.sessions.push(session),
            None => report.skipped += 1,
        }
    }
    report
}

/// Read and parse a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_import<Tz: TimeZone>(path: &Path, tz: &Tz) -> Result<ImportReport, KeytimeError> {
    let text = fs::read_to_string(path)?;
    let report = parse_csv(&text, tz);
    tracing::info!(
        path = %path.display(),
        accepted = report.accepted(),
        skipped = report.skipped,
        "csv parsed"
    );
    Ok(report)
}
