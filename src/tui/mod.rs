//! Terminal user interface for keytime.
//!
//! The live timer: shortcut keys start sessions, the header shows the
//! countdown or stopwatch, and the panels below show totals, the session
//! log and the daily chart. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, InputMode};
pub use event::{map_key, Action};

use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::prelude::*;

use crate::core::Clock;
use crate::error::KeytimeError;
use crate::features::share::apply_share_link;
use crate::features::tracking::{TerminalBell, Tracker};
use crate::storage::KeyValueStore;

/// Options for a TUI run.
#[derive(Debug, Clone)]
pub struct TuiOptions {
    /// Days in the chart window.
    pub window_days: u32,
    /// Redraw interval while no timer is running.
    pub idle_poll: Duration,
    /// Share link to load before starting.
    pub link: Option<String>,
}

/// Run the TUI application.
///
/// Any session still running when the user quits is saved.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run<S: KeyValueStore, C: Clock>(mut tracker: Tracker<S, C>, options: TuiOptions) -> Result<(), KeytimeError> {
    if let Some(link) = options.link.as_deref() {
        if let Some(count) = apply_share_link(&mut tracker, link) {
            tracing::info!(count, "shortcuts loaded from link");
        }
    }
    let mut app = App::new(tracker, options.window_days)?;

    enable_raw_mode().map_err(|e| KeytimeError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| KeytimeError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| KeytimeError::Terminal(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, &mut app, options.idle_poll);
    let saved = app.shutdown();

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle("")).ok();
    terminal.show_cursor().ok();

    result.and(saved)
}

/// Run the main application loop.
fn run_app<B: Backend, S: KeyValueStore, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
    idle_poll: Duration,
) -> Result<(), KeytimeError> {
    let mut title = String::new();
    let mut bell = TerminalBell::stdout();

    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| KeytimeError::Terminal(format!("Failed to draw: {e}")))?;

        let display = app.tracker.display();
        if display.title != title {
            execute!(io::stdout(), SetTitle(&display.title)).ok();
            title = display.title;
        }

        let timeout = app.tracker.time_until_tick().unwrap_or(idle_poll);
        if let Some(key) = event::next_key(timeout)? {
            if let Some(action) = map_key(app.input_mode(), key) {
                app.apply(action)?;
            }
        }
        app.tick(&mut bell)?;

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
