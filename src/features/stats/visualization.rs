//! Plain-text charts for the CLI.

use super::aggregate::{CategoryTotal, DailyGrid};
use crate::core::format_hms;

const SPARK_CHARS: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];
const FULL_BLOCK: char = '█';

fn fit_label(label: &str, width: usize) -> String {
    if label.chars().count() > width && width > 3 {
        let head: String = label.chars().take(width - 3).collect();
        format!("{head}...")
    } else {
        format!("{label:width$}")
    }
}

/// Render category totals as a horizontal bar chart.
///
/// Each line is `label |bars  Xh Ym Zs`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn render_bar_chart(totals: &[CategoryTotal], max_label_width: usize, bar_width: usize) -> String {
    if totals.is_empty() {
        return String::new();
    }

    let max_value = totals
        .iter()
        .map(|t| t.seconds)
        .fold(0.0_f64, f64::max);
    let label_width = totals
        .iter()
        .map(|t| t.category.chars().count())
        .max()
        .unwrap_or(0)
        .min(max_label_width);

    totals
        .iter()
        .map(|t| {
            let bar_length = if max_value > 0.0 {
                ((t.seconds / max_value) * bar_width as f64).round() as usize
            } else {
                0
            };
            let bar_length = bar_length.min(bar_width);
            format!(
                "{} |{}{} {}",
                fit_label(&t.category, label_width),
                FULL_BLOCK.to_string().repeat(bar_length),
                " ".repeat(bar_width - bar_length),
                format_hms(t.seconds)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a sparkline, one character per value.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn render_sparkline(values: &[f64]) -> String {
    let max_value = values.iter().copied().fold(0.0_f64, f64::max);

    values
        .iter()
        .map(|&v| {
            if v <= 0.0 || max_value <= 0.0 {
                SPARK_CHARS[0]
            } else {
                let level = ((v / max_value) * 7.0).ceil() as usize;
                SPARK_CHARS[level.clamp(1, 7)]
            }
        })
        .collect()
}

/// Render the daily grid: one sparkline row per category plus a total row.
#[must_use]
pub fn render_daily_chart(grid: &DailyGrid, max_label_width: usize) -> String {
    let (Some(first), Some(last)) = (grid.days.first(), grid.days.last()) else {
        return String::new();
    };

    let label_width = grid
        .series
        .iter()
        .map(|s| s.category.chars().count())
        .chain(std::iter::once("Total".len()))
        .max()
        .unwrap_or(0)
        .min(max_label_width);

    let mut lines = vec![format!(
        "{:label_width$}  {} .. {}",
        "",
        first.format("%m-%d"),
        last.format("%m-%d")
    )];

    for series in &grid.series {
        lines.push(format!(
            "{} |{}| {:.1}h",
            fit_label(&series.category, label_width),
            render_sparkline(&series.hours),
            series.total()
        ));
    }

    let totals = grid.day_totals();
    lines.push(format!(
        "{} |{}| {:.1}h",
        fit_label("Total", label_width),
        render_sparkline(&totals),
        totals.iter().sum::<f64>()
    ));

    lines.join("\n")
}
