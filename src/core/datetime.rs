//! Date and duration helpers shared by the CLI and the TUI.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Calendar day a timestamp falls on in the given timezone.
#[must_use]
pub fn local_day<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// Format seconds as a running clock, `HH:MM:SS` or `HH:MM:SS.d`.
///
/// Negative inputs are clamped to zero.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_clock(seconds: f64, tenths: bool) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let whole = seconds.floor() as u64;
    let h = whole / 3600;
    let m = (whole % 3600) / 60;
    let s = whole % 60;

    if tenths {
        let d = ((seconds - whole as f64) * 10.0).floor() as u64;
        format!("{h:02}:{m:02}:{s:02}.{}", d.min(9))
    } else {
        format!("{h:02}:{m:02}:{s:02}")
    }
}

/// Format seconds as `Xh Ym Zs`, the style used for totals.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_hms(seconds: f64) -> String {
    let whole = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    let h = whole / 3600;
    let m = (whole % 3600) / 60;
    let s = whole % 60;
    format!("{h}h {m}m {s}s")
}

/// Format seconds as `Ym Zs`, the style used for pause annotations.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_ms(seconds: f64) -> String {
    let whole = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    format!("{}m {}s", whole / 60, whole % 60)
}

/// Parse a day expression relative to `today`.
///
/// Supports `today`, `yesterday`, `tomorrow`, signed day offsets such as
/// `-3` or `+1`, and ISO dates (`2024-12-15`).
#[must_use]
pub fn parse_day(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "today" | "t" => return Some(today),
        "yesterday" | "y" => return Some(today - Duration::days(1)),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {},
    }

    if input.starts_with('-') || input.starts_with('+') {
        let offset: i64 = input.parse().ok()?;
        return today.checked_add_signed(Duration::days(offset));
    }

    NaiveDate::parse_from_str(&input, "%Y-%m-%d").ok()
}
