use colored::Colorize;

use crate::core::{format_hms, format_ms};
use crate::features::preferences::Preferences;
use crate::features::shortcuts::Shortcut;
use crate::features::stats::{render_bar_chart, render_daily_chart, LogEntry, StatsReport};
use crate::features::transfer::ImportReport;

const RULE_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 16;
const BAR_WIDTH: usize = 24;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

fn key_label(key: char) -> String {
    format!("[{key}]")
}

/// Format the shortcut list as a table.
pub fn format_shortcuts_pretty(shortcuts: &[Shortcut]) -> String {
    if shortcuts.is_empty() {
        return "Shortcuts (0)\n  No shortcuts. Add one with `keytime shortcut add <KEY> <CATEGORY>`".to_string();
    }

    let mut output = format!("Shortcuts ({})\n", shortcuts.len());
    output.push_str(&rule());
    output.push('\n');

    for shortcut in shortcuts {
        let mode = if shortcut.timer_minutes > 0 {
            format!("{}m countdown", shortcut.timer_minutes).yellow()
        } else {
            "stopwatch".dimmed()
        };
        output.push_str(&format!(
            "{} {}  {}\n",
            key_label(shortcut.key).cyan().bold(),
            shortcut.category.bold(),
            mode
        ));
    }

    output
}

/// Format one shortcut after it was saved.
pub fn format_shortcut_saved_pretty(shortcut: &Shortcut) -> String {
    let mode = if shortcut.timer_minutes > 0 {
        format!("{}m countdown", shortcut.timer_minutes)
    } else {
        "stopwatch".to_string()
    };
    format!(
        "{} {} {} ({})",
        "Saved".green(),
        key_label(shortcut.key).cyan().bold(),
        shortcut.category.bold(),
        mode
    )
}

/// Format the reverse-chronological session log.
pub fn format_log_pretty(entries: &[LogEntry], title: &str) -> String {
    if entries.is_empty() {
        return format!("{title} (0 sessions)\n  No sessions recorded");
    }

    let mut output = format!("{title} ({} sessions)\n", entries.len());
    output.push_str(&rule());
    output.push('\n');

    for entry in entries {
        let mut line = format!(
            "{:>4}  {}  {}-{}  {}  {}",
            format!("#{}", entry.index).dimmed(),
            entry.date.format("%Y-%m-%d"),
            entry.start.format("%H:%M:%S"),
            entry.end.format("%H:%M:%S"),
            format_hms(entry.duration_seconds).green(),
            entry.category.bold()
        );
        if let Some(paused) = entry.paused_seconds {
            line.push_str(&format!("  {}", format!("(paused {})", format_ms(paused)).dimmed()));
        }
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format the stats views for the cursor day.
pub fn format_stats_pretty(report: &StatsReport) -> String {
    let mut output = format!(
        "{} {}\n",
        "Stats for".bold(),
        report.day.format("%Y-%m-%d (%a)").to_string().bold()
    );
    output.push_str(&rule());
    output.push('\n');

    output.push_str(&format!(
        "{}: {} sessions, {}\n\n",
        "Day".dimmed(),
        report.summary.count,
        format_hms(report.summary.total_seconds)
    ));

    output.push_str(&format!("{}\n", "By category".bold()));
    if report.day_totals.is_empty() {
        output.push_str("  No sessions\n");
    } else {
        output.push_str(&render_bar_chart(&report.day_totals, LABEL_WIDTH, BAR_WIDTH));
        output.push('\n');
    }
    output.push('\n');

    output.push_str(&format!("{}\n", "All time".bold()));
    if report.all_time.is_empty() {
        output.push_str("  No sessions\n");
    } else {
        output.push_str(&render_bar_chart(&report.all_time, LABEL_WIDTH, BAR_WIDTH));
        output.push('\n');
    }
    output.push('\n');

    output.push_str(&format!("{} ({} days, hours)\n", "Daily".bold(), report.grid.days.len()));
    output.push_str(&render_daily_chart(&report.grid, LABEL_WIDTH));
    output.push('\n');

    output
}

/// Format preference values.
pub fn format_preferences_pretty(preferences: &Preferences) -> String {
    let on_off = |on: bool| if on { "on".green() } else { "off".red() };
    let theme = preferences.theme.map_or_else(
        || format!("{} (from terminal)", preferences.effective_theme()),
        |t| t.to_string(),
    );

    let mut output = format!("{}\n", "Settings".bold());
    output.push_str(&rule());
    output.push('\n');
    output.push_str(&format!("  {:<18} {}\n", "show-milliseconds", on_off(preferences.show_milliseconds)));
    output.push_str(&format!("  {:<18} {}\n", "play-sound", on_off(preferences.play_sound)));
    output.push_str(&format!("  {:<18} {}\n", "theme", theme));
    output
}

/// Format the outcome of reading an import file.
pub fn format_import_pretty(report: &ImportReport, merged_total: Option<usize>) -> String {
    let mut output = format!(
        "{} {} rows, {} {} rows",
        "Accepted".green(),
        report.accepted(),
        "skipped".yellow(),
        report.skipped
    );
    match merged_total {
        Some(total) => output.push_str(&format!("\nMerged. {total} sessions stored.")),
        None => output.push_str(&format!("\n{}", "Nothing imported.".dimmed())),
    }
    output
}
