//! Application state for the TUI.

use chrono::{Local, NaiveDate};

use crate::core::{local_day, Clock};
use crate::error::KeytimeError;
use crate::features::preferences::Theme;
use crate::features::shortcuts::Shortcut;
use crate::features::stats::{session_log, DayCursor, LogEntry, StatsReport};
use crate::features::tracking::{Alert, KeyOutcome, Session, TickEvent, Tracker};
use crate::storage::KeyValueStore;
use crate::tui::event::Action;

/// Field of the shortcut form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Single-character key.
    Key,
    /// Category name.
    Category,
    /// Countdown minutes.
    Timer,
}

impl FormField {
    const fn next(self) -> Self {
        match self {
            Self::Key => Self::Category,
            Self::Category => Self::Timer,
            Self::Timer => Self::Key,
        }
    }
}

/// The shortcut form in the settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutForm {
    /// Key input.
    pub key: String,
    /// Category input.
    pub category: String,
    /// Timer input, minutes.
    pub timer: String,
    /// Field receiving input.
    pub field: FormField,
}

impl Default for ShortcutForm {
    fn default() -> Self {
        Self {
            key: String::new(),
            category: String::new(),
            timer: String::new(),
            field: FormField::Key,
        }
    }
}

impl ShortcutForm {
    fn from_draft(draft: &Shortcut) -> Self {
        Self {
            key: draft.key.to_string(),
            category: draft.category.clone(),
            timer: draft.timer_minutes.to_string(),
            field: FormField::Category,
        }
    }

    fn push(&mut self, c: char) {
        match self.field {
            FormField::Key => {
                self.key.clear();
                self.key.push(c);
            },
            FormField::Category => self.category.push(c),
            FormField::Timer if c.is_ascii_digit() => self.timer.push(c),
            FormField::Timer => {},
        }
    }

    fn pop(&mut self) {
        match self.field {
            FormField::Key => self.key.pop(),
            FormField::Category => self.category.pop(),
            FormField::Timer => self.timer.pop(),
        };
    }

    fn timer_minutes(&self) -> Result<u32, KeytimeError> {
        let timer = self.timer.trim();
        if timer.is_empty() {
            return Ok(0);
        }
        timer
            .parse()
            .map_err(|_| KeytimeError::InvalidShortcut(format!("timer '{timer}' is not a number of minutes")))
    }
}

/// Destructive action waiting for a y/n answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    /// Delete this session, last seen at `index` in storage order.
    DeleteSession {
        /// Storage index when the question was asked.
        index: usize,
        /// The session itself, to find it again if the log changed.
        session: Session,
    },
    /// Delete every session.
    ClearAll,
}

/// Modal layer drawn over the main view.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// First-run introduction.
    Welcome,
    /// Key bindings.
    Help,
    /// A y/n question.
    Confirm(Pending),
}

/// Where key presses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Shortcut keys start sessions.
    Main,
    /// Keys edit the shortcut form.
    Settings,
    /// Any key dismisses the overlay.
    Overlay,
    /// Only y/n are accepted.
    Confirm,
}

/// Application state.
pub struct App<S, C> {
    /// The tracker being driven.
    pub tracker: Tracker<S, C>,
    /// Stats for the cursor day.
    pub report: StatsReport,
    /// Session log, newest first.
    pub log: Vec<LogEntry>,
    /// Day the stats panels show.
    pub cursor: DayCursor,
    /// Selected row in the log.
    pub selected_log: usize,
    /// Selected row in the shortcut list.
    pub selected_shortcut: usize,
    /// The shortcut form.
    pub form: ShortcutForm,
    /// Open overlay, if any.
    pub overlay: Option<Overlay>,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    window_days: u32,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    /// Create a new app instance.
    ///
    /// # Errors
    ///
    /// Returns an error if loading sessions fails.
    pub fn new(tracker: Tracker<S, C>, window_days: u32) -> Result<Self, KeytimeError> {
        let today = local_day(&tracker.now(), &Local);
        let overlay = (!tracker.preferences().has_visited).then_some(Overlay::Welcome);

        let mut app = Self {
            report: StatsReport::build(&[], today, window_days, &[], &Local),
            log: Vec::new(),
            cursor: DayCursor::new(today),
            selected_log: 0,
            selected_shortcut: 0,
            form: ShortcutForm::default(),
            overlay,
            status: Some("Press a shortcut key to start, F1 for help".to_string()),
            should_quit: false,
            window_days,
            tracker,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Today per the tracker's clock.
    pub fn today(&self) -> NaiveDate {
        local_day(&self.tracker.now(), &Local)
    }

    /// Theme to draw with.
    pub fn theme(&self) -> Theme {
        self.tracker.preferences().effective_theme()
    }

    /// Where key presses currently go.
    pub fn input_mode(&self) -> InputMode {
        match self.overlay {
            Some(Overlay::Confirm(_)) => InputMode::Confirm,
            Some(_) => InputMode::Overlay,
            None if self.tracker.settings_focused() => InputMode::Settings,
            None => InputMode::Main,
        }
    }

    /// Reload sessions from the store and recompute every panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn refresh(&mut self) -> Result<(), KeytimeError> {
        let sessions = self.tracker.sessions()?;
        let categories = self.tracker.shortcuts().categories();
        self.report = StatsReport::build(&sessions, self.cursor.day(), self.window_days, &categories, &Local);
        self.log = session_log(&sessions, &Local);

        if self.selected_log >= self.log.len() {
            self.selected_log = self.log.len().saturating_sub(1);
        }
        let shortcuts = self.tracker.shortcuts().len();
        if self.selected_shortcut >= shortcuts {
            self.selected_shortcut = shortcuts.saturating_sub(1);
        }
        Ok(())
    }

    /// The log entry under the selection.
    pub fn selected_entry(&self) -> Option<&LogEntry> {
        self.log.get(self.selected_log)
    }

    /// Apply a user action.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails. Invalid form input is reported
    /// in the status bar instead.
    pub fn apply(&mut self, action: Action) -> Result<(), KeytimeError> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Shortcut(c) => self.press(c)?,
            Action::TogglePause => {
                if let Some(state) = self.tracker.toggle_pause() {
                    self.status = Some(format!("{state}"));
                }
            },
            Action::Stop => {
                if let Some(session) = self.tracker.end_session()? {
                    self.status = Some(format!("Stopped {}", session.category));
                    self.refresh()?;
                }
            },
            Action::PreviousDay => self.move_cursor(DayCursor::previous)?,
            Action::NextDay => self.move_cursor(DayCursor::next)?,
            Action::Today => {
                let today = self.today();
                self.move_cursor(|c| c.reset(today))?;
            },
            Action::SelectUp => self.select_up(),
            Action::SelectDown => self.select_down(),
            Action::DeleteSelected => {
                let Some(index) = self.selected_entry().map(|entry| entry.index) else {
                    return Ok(());
                };
                if let Some(session) = self.tracker.sessions()?.into_iter().nth(index) {
                    self.overlay = Some(Overlay::Confirm(Pending::DeleteSession { index, session }));
                }
            },
            Action::ClearAll => {
                if !self.log.is_empty() {
                    self.overlay = Some(Overlay::Confirm(Pending::ClearAll));
                }
            },
            Action::Confirm(yes) => self.answer(yes)?,
            Action::ToggleSettings => {
                let open = !self.tracker.settings_focused();
                self.tracker.set_settings_focused(open);
                self.status = Some(if open {
                    "Settings: Tab next field, Enter save, Ctrl-E edit, Ctrl-D delete, Esc close".to_string()
                } else {
                    "Settings closed".to_string()
                });
            },
            Action::NextField => self.form.field = self.form.field.next(),
            Action::Input(c) => self.form.push(c),
            Action::Backspace => self.form.pop(),
            Action::Submit => self.submit_form()?,
            Action::EditShortcut => self.edit_selected_shortcut()?,
            Action::DeleteShortcut => self.delete_selected_shortcut()?,
            Action::ToggleMilliseconds => {
                let on = !self.tracker.preferences().show_milliseconds;
                self.tracker.set_show_milliseconds(on)?;
                self.status = Some(format!("Milliseconds {}", on_off(on)));
            },
            Action::ToggleSound => {
                let on = !self.tracker.preferences().play_sound;
                self.tracker.set_play_sound(on)?;
                self.status = Some(format!("Sound {}", on_off(on)));
            },
            Action::ToggleTheme => {
                let theme = self.theme().toggled();
                self.tracker.set_theme(theme)?;
                self.status = Some(format!("Theme {theme}"));
            },
            Action::Help => self.overlay = Some(Overlay::Help),
            Action::Dismiss => {
                if self.overlay == Some(Overlay::Welcome) {
                    self.tracker.mark_visited()?;
                }
                self.overlay = None;
            },
        }
        Ok(())
    }

    fn press(&mut self, c: char) -> Result<(), KeytimeError> {
        match self.tracker.handle_key(c)? {
            KeyOutcome::Started { category, ended } => {
                self.status = Some(format!("Started {category}"));
                if ended.is_some() {
                    self.refresh()?;
                }
            },
            KeyOutcome::PauseToggled(state) => self.status = Some(format!("{state}")),
            KeyOutcome::Ignored => {},
        }
        Ok(())
    }

    fn move_cursor(&mut self, step: impl FnOnce(&mut DayCursor)) -> Result<(), KeytimeError> {
        step(&mut self.cursor);
        self.refresh()
    }

    fn select_up(&mut self) {
        let selected = if self.tracker.settings_focused() {
            &mut self.selected_shortcut
        } else {
            &mut self.selected_log
        };
        *selected = selected.saturating_sub(1);
    }

    fn select_down(&mut self) {
        let (selected, len) = if self.tracker.settings_focused() {
            (&mut self.selected_shortcut, self.tracker.shortcuts().len())
        } else {
            (&mut self.selected_log, self.log.len())
        };
        if *selected + 1 < len {
            *selected += 1;
        }
    }

    fn answer(&mut self, yes: bool) -> Result<(), KeytimeError> {
        let Some(Overlay::Confirm(pending)) = self.overlay.take() else {
            return Ok(());
        };
        if !yes {
            self.status = Some("Cancelled".to_string());
            return Ok(());
        }

        match pending {
            Pending::DeleteSession { index, session } => {
                let sessions = self.tracker.sessions()?;
                let found = if sessions.get(index) == Some(&session) {
                    Some(index)
                } else {
                    sessions.iter().position(|s| *s == session)
                };
                match found.map(|i| self.tracker.delete_session(i)) {
                    Some(Ok(removed)) => self.status = Some(format!("Deleted {} session", removed.category)),
                    None | Some(Err(KeytimeError::NotFound(_))) => {
                        self.status = Some("That session no longer exists".to_string());
                    },
                    Some(Err(e)) => return Err(e),
                }
            },
            Pending::ClearAll => {
                let count = self.tracker.clear_sessions()?;
                self.status = Some(format!("Cleared {count} sessions"));
            },
        }
        self.refresh()
    }

    fn submit_form(&mut self) -> Result<(), KeytimeError> {
        let result = self
            .form
            .timer_minutes()
            .and_then(|timer| self.tracker.add_shortcut(&self.form.key, &self.form.category, timer));

        match result {
            Ok(key) => {
                self.status = Some(format!("Saved [{key}] {}", self.form.category.trim()));
                self.form = ShortcutForm::default();
                self.refresh()
            },
            Err(KeytimeError::InvalidShortcut(msg)) => {
                self.status = Some(format!("Invalid shortcut: {msg}"));
                Ok(())
            },
            Err(e) => Err(e),
        }
    }

    fn selected_shortcut_key(&self) -> Option<char> {
        self.tracker
            .shortcuts()
            .iter()
            .nth(self.selected_shortcut)
            .map(|s| s.key)
    }

    fn edit_selected_shortcut(&mut self) -> Result<(), KeytimeError> {
        let Some(key) = self.selected_shortcut_key() else {
            return Ok(());
        };
        if let Some(draft) = self.tracker.edit_shortcut(key)? {
            self.form = ShortcutForm::from_draft(&draft);
            self.status = Some(format!("Editing [{key}]; Enter saves"));
            self.refresh()?;
        }
        Ok(())
    }

    fn delete_selected_shortcut(&mut self) -> Result<(), KeytimeError> {
        let Some(key) = self.selected_shortcut_key() else {
            return Ok(());
        };
        if self.tracker.delete_shortcut(key)? {
            self.status = Some(format!("Deleted shortcut [{key}]"));
            self.refresh()?;
        }
        Ok(())
    }

    /// Run a due tick, recording an expired countdown, then reload the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn tick(&mut self, alert: &mut dyn Alert) -> Result<(), KeytimeError> {
        if let Some(TickEvent::Expired(session)) = self.tracker.tick(alert)? {
            self.status = Some(format!("Time's up: {}", session.category));
        }
        // Other processes may have changed the log since the last pass.
        self.refresh()
    }

    /// End any active session before exit.
    ///
    /// # Errors
    ///
    /// Returns an error if saving the session fails.
    pub fn shutdown(&mut self) -> Result<(), KeytimeError> {
        if let Some(session) = self.tracker.end_session()? {
            tracing::info!(category = %session.category, "active session closed on exit");
        }
        Ok(())
    }
}

const fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::tracking::{Silent, TrackerState};
    use crate::storage::{Database, MemoryStore, SqliteStore};
    use chrono::{TimeZone, Utc};

    fn clock() -> ManualClock {
        ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap())
    }

    fn app(clock: &ManualClock) -> App<MemoryStore, &ManualClock> {
        let mut tracker = Tracker::open(MemoryStore::new(), clock).unwrap();
        tracker.add_shortcut("w", "Work", 1).unwrap();
        tracker.add_shortcut("r", "Reading", 0).unwrap();
        App::new(tracker, 14).unwrap()
    }

    #[test]
    fn test_welcome_shown_once() {
        let clock = clock();
        let mut app = app(&clock);
        assert_eq!(app.overlay, Some(Overlay::Welcome));
        assert_eq!(app.input_mode(), InputMode::Overlay);

        app.apply(Action::Dismiss).unwrap();
        assert_eq!(app.overlay, None);

        let again = App::new(Tracker::open(app.tracker.store().clone(), &clock).unwrap(), 14).unwrap();
        assert_eq!(again.overlay, None);
    }

    #[test]
    fn test_session_flow_updates_log() {
        let clock = clock();
        let mut app = app(&clock);
        app.apply(Action::Dismiss).unwrap();

        app.apply(Action::Shortcut('r')).unwrap();
        clock.advance_secs(90);
        app.apply(Action::TogglePause).unwrap();
        assert_eq!(app.tracker.state(), TrackerState::Paused);
        app.apply(Action::Stop).unwrap();

        assert_eq!(app.log.len(), 1);
        assert_eq!(app.log[0].category, "Reading");
        assert_eq!(app.report.summary.count, 1);
    }

    #[test]
    fn test_countdown_expiry_refreshes() {
        let clock = clock();
        let mut app = app(&clock);
        app.apply(Action::Shortcut('w')).unwrap();
        for _ in 0..60 {
            clock.advance_secs(1);
            app.tick(&mut Silent).unwrap();
        }
        assert_eq!(app.tracker.state(), TrackerState::Idle);
        assert_eq!(app.log.len(), 1);
        assert!(app.status.as_deref().unwrap().contains("Work"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let clock = clock();
        let mut app = app(&clock);
        for _ in 0..2 {
            app.apply(Action::Shortcut('r')).unwrap();
            clock.advance_secs(30);
        }
        app.apply(Action::Stop).unwrap();
        assert_eq!(app.log.len(), 2);

        app.apply(Action::DeleteSelected).unwrap();
        assert_eq!(app.input_mode(), InputMode::Confirm);
        app.apply(Action::Confirm(false)).unwrap();
        assert_eq!(app.log.len(), 2);

        app.apply(Action::DeleteSelected).unwrap();
        app.apply(Action::Confirm(true)).unwrap();
        assert_eq!(app.log.len(), 1);
        assert_eq!(app.log[0].index, 0);

        app.apply(Action::ClearAll).unwrap();
        app.apply(Action::Confirm(true)).unwrap();
        assert!(app.log.is_empty());
    }

    #[test]
    fn test_settings_block_shortcuts_and_edit_form() {
        let clock = clock();
        let mut app = app(&clock);
        app.apply(Action::Dismiss).unwrap();
        app.apply(Action::ToggleSettings).unwrap();
        assert_eq!(app.input_mode(), InputMode::Settings);

        app.apply(Action::Shortcut('w')).unwrap();
        assert_eq!(app.tracker.state(), TrackerState::Idle);

        app.apply(Action::Input('s')).unwrap();
        app.apply(Action::NextField).unwrap();
        for c in "Study".chars() {
            app.apply(Action::Input(c)).unwrap();
        }
        app.apply(Action::NextField).unwrap();
        for c in "4x5".chars() {
            app.apply(Action::Input(c)).unwrap();
        }
        app.apply(Action::Submit).unwrap();
        assert_eq!(app.tracker.shortcuts().get('s').unwrap().timer_minutes, 45);
        assert_eq!(app.form, ShortcutForm::default());

        app.apply(Action::EditShortcut).unwrap();
        assert_eq!(app.form.key, "w");
        assert!(app.tracker.shortcuts().get('w').is_none());
        app.apply(Action::Submit).unwrap();
        assert!(app.tracker.shortcuts().get('w').is_some());
    }

    #[test]
    fn test_invalid_form_reports_in_status() {
        let clock = clock();
        let mut app = app(&clock);
        app.apply(Action::ToggleSettings).unwrap();
        app.apply(Action::Submit).unwrap();
        assert!(app.status.as_deref().unwrap().starts_with("Invalid shortcut"));
        assert_eq!(app.tracker.shortcuts().len(), 2);
    }

    #[test]
    fn test_day_cursor_moves() {
        let clock = clock();
        let mut app = app(&clock);
        let today = app.today();
        app.apply(Action::PreviousDay).unwrap();
        assert_eq!(app.report.day, today.pred_opt().unwrap());
        app.apply(Action::Today).unwrap();
        assert_eq!(app.report.day, today);
    }

    fn shared_apps<'a>(path: &std::path::Path, clock: &'a ManualClock) -> (App<SqliteStore, &'a ManualClock>, Tracker<SqliteStore, &'a ManualClock>) {
        let open = || Tracker::open(SqliteStore::new(Database::open_at(path).unwrap()), clock).unwrap();
        let mut tracker = open();
        let start = clock.now();
        let sessions = ["A", "B", "C"]
            .iter()
            .zip(0..)
            .map(|(category, i)| Session {
                category: (*category).to_string(),
                start_time: start + chrono::Duration::minutes(i * 10),
                end_time: start + chrono::Duration::minutes(i * 10 + 5),
                duration_seconds: 300.0,
            })
            .collect();
        tracker.import_sessions(sessions).unwrap();
        let mut app = App::new(tracker, 14).unwrap();
        app.overlay = None;
        (app, open())
    }

    fn categories(app: &App<SqliteStore, &ManualClock>) -> Vec<String> {
        app.tracker.sessions().unwrap().into_iter().map(|s| s.category).collect()
    }

    #[test]
    fn test_tick_picks_up_external_delete() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = clock();
        let (mut app, mut other) = shared_apps(&temp.path().join("keytime.db"), &clock);
        assert_eq!(app.log.len(), 3);

        other.delete_session(0).unwrap();
        app.tick(&mut Silent).unwrap();
        assert_eq!(app.log.len(), 2);

        assert_eq!(app.selected_entry().unwrap().category, "C");
        app.apply(Action::DeleteSelected).unwrap();
        app.apply(Action::Confirm(true)).unwrap();
        assert_eq!(categories(&app), vec!["B"]);
    }

    #[test]
    fn test_confirm_after_external_change_deletes_same_session() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = clock();
        let (mut app, mut other) = shared_apps(&temp.path().join("keytime.db"), &clock);

        assert_eq!(app.selected_entry().unwrap().category, "C");
        app.apply(Action::DeleteSelected).unwrap();
        other.delete_session(0).unwrap();
        app.apply(Action::Confirm(true)).unwrap();
        assert_eq!(categories(&app), vec!["B"]);
        assert_eq!(app.status.as_deref(), Some("Deleted C session"));
    }

    #[test]
    fn test_confirm_for_vanished_session_reports_in_status() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = clock();
        let (mut app, mut other) = shared_apps(&temp.path().join("keytime.db"), &clock);

        app.apply(Action::DeleteSelected).unwrap();
        other.delete_session(2).unwrap();
        app.apply(Action::Confirm(true)).unwrap();
        assert_eq!(categories(&app), vec!["A", "B"]);
        assert_eq!(app.status.as_deref(), Some("That session no longer exists"));
        assert_eq!(app.overlay, None);
    }

    #[test]
    fn test_shutdown_persists_active_session() {
        let clock = clock();
        let mut app = app(&clock);
        app.apply(Action::Shortcut('r')).unwrap();
        clock.advance_secs(42);
        app.shutdown().unwrap();
        assert_eq!(app.tracker.sessions().unwrap().len(), 1);
    }
}
