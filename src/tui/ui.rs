//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::core::{format_hms, format_ms, Clock};
use crate::features::preferences::Theme;
use crate::features::stats::CategoryTotal;
use crate::features::tracking::TrackerState;
use crate::storage::KeyValueStore;
use crate::tui::app::{App, FormField, Overlay, Pending};

/// Colors for one theme.
#[derive(Debug, Clone, Copy)]
struct Palette {
    text: Color,
    accent: Color,
    muted: Color,
    selected: Color,
}

impl Palette {
    const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Color::White,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                selected: Color::DarkGray,
            },
            Theme::Light => Self {
                text: Color::Black,
                accent: Color::Blue,
                muted: Color::Gray,
                selected: Color::Gray,
            },
        }
    }

    fn block(self, title: &str) -> Block<'_> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent))
            .title(title)
    }
}

/// Render the application UI.
pub fn render<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>) {
    let palette = Palette::for_theme(app.theme());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Timer
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, palette, chunks[0]);
    if app.tracker.settings_focused() {
        render_settings(frame, app, palette, chunks[1]);
    } else {
        render_body(frame, app, palette, chunks[1]);
    }
    render_status_bar(frame, app, palette, chunks[2]);

    if let Some(overlay) = &app.overlay {
        render_overlay(frame, overlay, palette);
    }
}

fn render_header<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, palette: Palette, area: Rect) {
    let display = app.tracker.display();
    let state_color = match display.state {
        TrackerState::Idle => palette.muted,
        TrackerState::Running => Color::Green,
        TrackerState::Paused => Color::Yellow,
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", display.clock),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{}]", display.state), Style::default().fg(state_color)),
    ];
    if let Some(category) = display.category {
        spans.push(Span::styled(format!("  {category}"), Style::default().fg(palette.text)));
    }

    let header = Paragraph::new(Line::from(spans)).block(palette.block(" keytime "));
    frame.render_widget(header, area);
}

fn render_body<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, palette: Palette, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(30), Constraint::Percentage(40)])
        .split(rows[0]);

    let day_title = if app.cursor.is_today(app.today()) {
        " Today ".to_string()
    } else {
        format!(" {} ", app.report.day.format("%Y-%m-%d"))
    };
    render_totals(frame, &app.report.day_totals, &day_title, palette, top[0]);
    render_totals(frame, &app.report.all_time, " All time ", palette, top[1]);
    render_log(frame, app, palette, top[2]);
    render_chart(frame, app, palette, rows[1]);
}

fn render_totals(frame: &mut Frame<'_>, totals: &[CategoryTotal], title: &str, palette: Palette, area: Rect) {
    let items: Vec<ListItem<'_>> = if totals.is_empty() {
        vec![ListItem::new(Span::styled("No sessions", Style::default().fg(palette.muted)))]
    } else {
        totals
            .iter()
            .map(|t| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<12} ", t.category), Style::default().fg(palette.text)),
                    Span::styled(format_hms(t.seconds), Style::default().fg(palette.accent)),
                ]))
            })
            .collect()
    };

    frame.render_widget(List::new(items).block(palette.block(title)), area);
}

fn render_log<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, palette: Palette, area: Rect) {
    let items: Vec<ListItem<'_>> = app
        .log
        .iter()
        .map(|entry| {
            let mut spans = vec![
                Span::styled(format!("#{:<3} ", entry.index), Style::default().fg(palette.muted)),
                Span::styled(
                    format!(
                        "{} {}-{} ",
                        entry.date.format("%m-%d"),
                        entry.start.format("%H:%M"),
                        entry.end.format("%H:%M")
                    ),
                    Style::default().fg(palette.text),
                ),
                Span::styled(format!("{:>11} ", format_hms(entry.duration_seconds)), Style::default().fg(palette.accent)),
                Span::styled(entry.category.clone(), Style::default().fg(palette.text)),
            ];
            if let Some(paused) = entry.paused_seconds {
                spans.push(Span::styled(
                    format!(" (paused {})", format_ms(paused)),
                    Style::default().fg(Color::Yellow),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(palette.block(" Log (Del to delete) "))
        .highlight_style(Style::default().bg(palette.selected));

    let mut state = ListState::default();
    if !app.log.is_empty() {
        state.select(Some(app.selected_log));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_chart<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, palette: Palette, area: Rect) {
    let grid = &app.report.grid;
    let totals = grid.day_totals();

    let bars: Vec<Bar<'_>> = grid
        .days
        .iter()
        .zip(&totals)
        .map(|(day, hours)| {
            let minutes = (hours * 60.0).round().max(0.0) as u64;
            let style = if *day == app.report.day {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.muted)
            };
            Bar::default()
                .value(minutes)
                .label(Line::from(day.format("%d").to_string()))
                .text_value(format!("{}h{:02}", minutes / 60, minutes % 60))
                .style(style)
                .value_style(Style::default().fg(palette.text))
        })
        .collect();

    let bar_count = u16::try_from(bars.len().max(1)).unwrap_or(u16::MAX);
    let bar_width = (area.width.saturating_sub(2) / bar_count).saturating_sub(1).clamp(1, 6);

    let title = format!(" Last {} days ", grid.days.len());
    let chart = BarChart::default()
        .block(palette.block(&title))
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_settings<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, palette: Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(columns[0]);

    let field = |label: &str, value: &str, which: FormField| {
        let style = if app.form.field == which {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), Style::default().fg(palette.muted)),
            Span::styled(format!("{value}_"), style),
        ])
    };
    let form = Paragraph::new(vec![
        field("Key", &app.form.key, FormField::Key),
        field("Category", &app.form.category, FormField::Category),
        field("Timer min", &app.form.timer, FormField::Timer),
    ])
    .block(palette.block(" New shortcut "));
    frame.render_widget(form, left[0]);

    let preferences = app.tracker.preferences();
    let prefs = Paragraph::new(vec![
        Line::from(format!("F2 Milliseconds  {}", on_off(preferences.show_milliseconds))),
        Line::from(format!("F3 Sound         {}", on_off(preferences.play_sound))),
        Line::from(format!("F4 Theme         {}", app.theme())),
    ])
    .style(Style::default().fg(palette.text))
    .block(palette.block(" Preferences "));
    frame.render_widget(prefs, left[1]);

    let items: Vec<ListItem<'_>> = app
        .tracker
        .shortcuts()
        .iter()
        .map(|s| {
            let mode = if s.timer_minutes > 0 {
                format!("{}m", s.timer_minutes)
            } else {
                "stopwatch".to_string()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", s.key), Style::default().fg(palette.accent)),
                Span::styled(format!("{:<16}", s.category), Style::default().fg(palette.text)),
                Span::styled(mode, Style::default().fg(palette.muted)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(palette.block(" Shortcuts (Ctrl-E edit, Ctrl-D delete) "))
        .highlight_style(Style::default().bg(palette.selected));

    let mut state = ListState::default();
    if !app.tracker.shortcuts().is_empty() {
        state.select(Some(app.selected_shortcut));
    }
    frame.render_stateful_widget(list, columns[1], &mut state);
}

fn render_status_bar<S: KeyValueStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, palette: Palette, area: Rect) {
    let status_text = app
        .status
        .as_deref()
        .unwrap_or("Space:pause | Enter:stop | Left/Right:day | Tab:settings | F1:help | Esc:quit");

    let status = Paragraph::new(status_text).style(Style::default().fg(palette.muted));
    frame.render_widget(status, area);
}

fn render_overlay(frame: &mut Frame<'_>, overlay: &Overlay, palette: Palette) {
    let (title, body, height) = match overlay {
        Overlay::Welcome => (
            " Welcome ",
            "Track time with single keys.\n\nOpen settings with Tab and add a shortcut: a key, a \
             category and an optional countdown in minutes. Then press that key here to start \
             timing. Press it again, or Space, to pause.\n\nPress any key to begin.",
            50,
        ),
        Overlay::Help => (
            " Keys ",
            "<key>        start the shortcut's session\n\
             Space        pause / resume\n\
             Enter        stop and save\n\
             Left/Right   previous / next day\n\
             Home         back to today\n\
             Up/Down      select log entry\n\
             Del          delete selected session\n\
             Ctrl-X       delete all sessions\n\
             Tab          settings\n\
             F2 F3 F4     milliseconds, sound, theme\n\
             Esc          quit",
            60,
        ),
        Overlay::Confirm(Pending::DeleteSession { .. }) => (" Confirm ", "Delete this session? [y/N]", 20),
        Overlay::Confirm(Pending::ClearAll) => (" Confirm ", "Delete ALL sessions? [y/N]", 20),
    };

    let area = centered_rect(60, height, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(palette.text))
        .block(palette.block(title));
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

const fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
