//! Statistics over the session log.
//!
//! - All-time and per-day category totals
//! - Reverse-chronological session log
//! - Daily hours grid ending at the day cursor
//! - Text charts for the CLI

pub mod aggregate;
pub mod visualization;

pub use aggregate::{
    category_totals, daily_grid, day_totals, session_log, sessions_on_day, CategoryTotal, DailyGrid,
    DayCursor, DaySummary, LogEntry, Series, StatsReport, DEFAULT_WINDOW_DAYS,
};
pub use visualization::{render_bar_chart, render_daily_chart, render_sparkline};
