//! Aggregation over the session log.
//!
//! Every function here is pure: it takes the full session list and the
//! timezone that defines "a day", and never touches the store.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;

use crate::core::local_day;
use crate::features::tracking::Session;

/// Default length of the daily chart window.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Time spent on one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// Category name.
    pub category: String,
    /// Summed active time.
    pub seconds: f64,
}

/// Sum active time per category, keeping first-appearance order.
pub fn category_totals<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for session in sessions {
        match totals.iter_mut().find(|t| t.category == session.category) {
            Some(total) => total.seconds += session.duration_seconds,
            None => totals.push(CategoryTotal {
                category: session.category.clone(),
                seconds: session.duration_seconds,
            }),
        }
    }
    totals
}

/// Sessions whose start falls on `day` in `tz`.
pub fn sessions_on_day<'a, Tz: TimeZone>(
    sessions: &'a [Session],
    day: NaiveDate,
    tz: &'a Tz,
) -> impl Iterator<Item = &'a Session> + 'a {
    sessions
        .iter()
        .filter(move |s| local_day(&s.start_time, tz) == day)
}

/// Per-category totals for a single local day.
pub fn day_totals<Tz: TimeZone>(sessions: &[Session], day: NaiveDate, tz: &Tz) -> Vec<CategoryTotal> {
    category_totals(sessions_on_day(sessions, day, tz))
}

/// Count and total for a single local day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    /// The day.
    pub day: NaiveDate,
    /// Number of sessions started that day.
    pub count: usize,
    /// Summed active time.
    pub total_seconds: f64,
}

impl DaySummary {
    /// Summarize `day`.
    pub fn for_day<Tz: TimeZone>(sessions: &[Session], day: NaiveDate, tz: &Tz) -> Self {
        let (count, total_seconds) = sessions_on_day(sessions, day, tz)
            .fold((0, 0.0), |(n, secs), s| (n + 1, secs + s.duration_seconds));
        Self {
            day,
            count,
            total_seconds,
        }
    }
}

/// One row of the reverse-chronological session log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Position in storage, used for deletion.
    pub index: usize,
    /// Local start date.
    pub date: NaiveDate,
    /// Local start time.
    pub start: NaiveTime,
    /// Local end time.
    pub end: NaiveTime,
    /// Category name.
    pub category: String,
    /// Active time.
    pub duration_seconds: f64,
    /// Wall span minus active time, when at least one second.
    pub paused_seconds: Option<f64>,
}

/// Build the log newest first, each entry keeping its storage index.
pub fn session_log<Tz: TimeZone>(sessions: &[Session], tz: &Tz) -> Vec<LogEntry> {
    sessions
        .iter()
        .enumerate()
        .rev()
        .map(|(index, s)| {
            let start = s.start_time.with_timezone(tz);
            let end = s.end_time.with_timezone(tz);
            LogEntry {
                index,
                date: start.date_naive(),
                start: start.time(),
                end: end.time(),
                category: s.category.clone(),
                duration_seconds: s.duration_seconds,
                paused_seconds: s.paused_seconds(),
            }
        })
        .collect()
}

/// Hours per day for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Category name.
    pub category: String,
    /// One value per day of the window, in hours.
    pub hours: Vec<f64>,
}

impl Series {
    /// Sum over the window, in hours.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.hours.iter().sum()
    }
}

/// Per-category, per-day hours over a window of days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyGrid {
    /// Days of the window, oldest first.
    pub days: Vec<NaiveDate>,
    /// One series per category.
    pub series: Vec<Series>,
}

impl DailyGrid {
    /// Hours across all categories for each day.
    #[must_use]
    pub fn day_totals(&self) -> Vec<f64> {
        (0..self.days.len())
            .map(|i| self.series.iter().map(|s| s.hours[i]).sum())
            .collect()
    }
}

/// Build the grid for the `window_days` days ending at `end_day`.
///
/// Series appear in first-appearance order of the sessions inside the
/// window; registered categories with no time follow as zero series.
pub fn daily_grid<Tz: TimeZone>(
    sessions: &[Session],
    end_day: NaiveDate,
    window_days: u32,
    registered: &[String],
    tz: &Tz,
) -> DailyGrid {
    let window = i64::from(window_days.max(1));
    let first_day = end_day - Duration::days(window - 1);
    let days: Vec<NaiveDate> = (0..window).map(|i| first_day + Duration::days(i)).collect();

    let mut series: Vec<Series> = Vec::new();
    for session in sessions {
        let day = local_day(&session.start_time, tz);
        if day < first_day || day > end_day {
            continue;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let slot = (day - first_day).num_days() as usize;

        let position = match series.iter().position(|s| s.category == session.category) {
            Some(p) => p,
            None => {
                series.push(Series {
                    category: session.category.clone(),
                    hours: vec![0.0; days.len()],
                });
                series.len() - 1
            },
        };
        series[position].hours[slot] += session.duration_seconds / 3600.0;
    }

    for category in registered {
        if !series.iter().any(|s| &s.category == category) {
            series.push(Series {
                category: category.clone(),
                hours: vec![0.0; days.len()],
            });
        }
    }

    DailyGrid { days, series }
}

/// The day the per-day views are showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCursor {
    day: NaiveDate,
}

impl DayCursor {
    /// A cursor on `today`.
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self { day: today }
    }

    /// The selected day.
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Step one day back.
    pub fn previous(&mut self) {
        self.day = self.day.pred_opt().unwrap_or(self.day);
    }

    /// Step one day forward.
    pub fn next(&mut self) {
        self.day = self.day.succ_opt().unwrap_or(self.day);
    }

    /// Jump back to `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        self.day = today;
    }

    /// Whether the cursor is on `today`.
    #[must_use]
    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.day == today
    }
}

/// Everything the stats views show for one cursor position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    /// The cursor day.
    pub day: NaiveDate,
    /// All-time totals.
    pub all_time: Vec<CategoryTotal>,
    /// Totals for the cursor day.
    pub day_totals: Vec<CategoryTotal>,
    /// Count and total for the cursor day.
    pub summary: DaySummary,
    /// Window ending at the cursor day.
    pub grid: DailyGrid,
}

impl StatsReport {
    /// Aggregate `sessions` around `day`.
    pub fn build<Tz: TimeZone>(
        sessions: &[Session],
        day: NaiveDate,
        window_days: u32,
        registered: &[String],
        tz: &Tz,
    ) -> Self {
        Self {
            day,
            all_time: category_totals(sessions),
            day_totals: day_totals(sessions, day, tz),
            summary: DaySummary::for_day(sessions, day, tz),
            grid: daily_grid(sessions, day, window_days, registered, tz),
        }
    }
}
