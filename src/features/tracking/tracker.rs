//! Application state: shortcuts, preferences and the session state machine.
//!
//! `Tracker` is the single owner of all mutable state. Front-ends hold one
//! and call into it on discrete events (key press, tick, command).

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::active::{ActiveSession, PauseInterval, TrackerState};
use super::alert::Alert;
use super::session::{append_sessions, load_sessions, save_sessions, Session};
use super::ticker::{tick_period, TickMode, Ticker};
use crate::core::{format_clock, Clock};
use crate::error::KeytimeError;
use crate::features::preferences::{Preferences, Theme};
use crate::features::shortcuts::{lowercase_key, Shortcut, ShortcutRegistry, PAUSE_KEY};
use crate::storage::{keys, KeyValueStore};

/// Title shown when nothing is being tracked.
pub const IDLE_TITLE: &str = "keytime";

/// Result of a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// The key did nothing.
    Ignored,
    /// The pause key toggled the active session into this state.
    PauseToggled(TrackerState),
    /// A session started; the previous one, if any, was closed first.
    Started {
        /// Category of the new session.
        category: String,
        /// Session that was implicitly ended.
        ended: Option<Session>,
    },
}

/// Result of a due tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// The display should be redrawn.
    Refresh,
    /// A countdown ran out and was recorded.
    Expired(Session),
}

/// What the timer display should show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerDisplay {
    /// `HH:MM:SS` or `HH:MM:SS.d`.
    pub clock: String,
    /// Window title, `"<clock> - <category>"`.
    pub title: String,
    /// Active category, if any.
    pub category: Option<String>,
    /// Current state.
    pub state: TrackerState,
}

/// The tracker application state.
pub struct Tracker<S, C> {
    store: S,
    clock: C,
    shortcuts: ShortcutRegistry,
    preferences: Preferences,
    active: Option<ActiveSession>,
    ticker: Ticker,
    pause_intervals: Vec<PauseInterval>,
    settings_focused: bool,
}

impl<S: KeyValueStore, C: Clock> Tracker<S, C> {
    /// Load shortcuts and preferences from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or holds malformed shortcut data.
    pub fn open(store: S, clock: C) -> Result<Self, KeytimeError> {
        let shortcuts = match store.get(keys::SHORTCUTS)? {
            Some(json) => ShortcutRegistry::from_json(&json)?,
            None => ShortcutRegistry::new(),
        };
        let preferences = Preferences::load(&store)?;

        tracing::debug!(shortcuts = shortcuts.len(), "tracker opened");

        Ok(Self {
            store,
            clock,
            shortcuts,
            preferences,
            active: None,
            ticker: Ticker::default(),
            pause_intervals: Vec::new(),
            settings_focused: false,
        })
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The clock in use.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Current wall-clock time.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ---------------------------------------------------------------------
    // Shortcuts
    // ---------------------------------------------------------------------

    /// The shortcut registry.
    pub const fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    fn save_shortcuts(&mut self) -> Result<(), KeytimeError> {
        let json = self.shortcuts.to_json()?;
        self.store.set(keys::SHORTCUTS, &json)
    }

    /// Add or overwrite a shortcut and persist the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the shortcut is invalid or the store fails.
    pub fn add_shortcut(&mut self, key: &str, category: &str, timer_minutes: u32) -> Result<char, KeytimeError> {
        let key = self.shortcuts.add(key, category, timer_minutes)?;
        self.save_shortcuts()?;
        tracing::info!(%key, category, timer_minutes, "shortcut saved");
        Ok(key)
    }

    /// Delete a shortcut and persist the registry. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn delete_shortcut(&mut self, key: char) -> Result<bool, KeytimeError> {
        let removed = self.shortcuts.remove(lowercase_key(key));
        if removed {
            self.save_shortcuts()?;
            tracing::info!(%key, "shortcut deleted");
        }
        Ok(removed)
    }

    /// Remove a shortcut and return it so it can be edited and re-added.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn edit_shortcut(&mut self, key: char) -> Result<Option<Shortcut>, KeytimeError> {
        let draft = self.shortcuts.take_for_edit(lowercase_key(key));
        if draft.is_some() {
            self.save_shortcuts()?;
        }
        Ok(draft)
    }

    /// Replace the whole registry and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn replace_shortcuts(&mut self, registry: ShortcutRegistry) -> Result<(), KeytimeError> {
        self.shortcuts = registry;
        self.save_shortcuts()
    }

    // ---------------------------------------------------------------------
    // Preferences
    // ---------------------------------------------------------------------

    /// Current preferences.
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Toggle tenths-of-a-second display. A running tick is rescheduled at
    /// the new rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn set_show_milliseconds(&mut self, on: bool) -> Result<(), KeytimeError> {
        self.preferences.set_show_milliseconds(&mut self.store, on)?;
        if let Some(mode) = self.ticker.mode() {
            self.ticker
                .start(mode, tick_period(on), self.clock.instant());
        }
        Ok(())
    }

    /// Toggle the expiry sound.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn set_play_sound(&mut self, on: bool) -> Result<(), KeytimeError> {
        self.preferences.set_play_sound(&mut self.store, on)
    }

    /// Set the color theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), KeytimeError> {
        self.preferences.set_theme(&mut self.store, theme)
    }

    /// Record that the welcome overlay has been seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn mark_visited(&mut self) -> Result<(), KeytimeError> {
        self.preferences.mark_visited(&mut self.store)
    }

    // ---------------------------------------------------------------------
    // Session state machine
    // ---------------------------------------------------------------------

    /// Whether the settings surface has keyboard focus.
    pub const fn settings_focused(&self) -> bool {
        self.settings_focused
    }

    /// Give or take keyboard focus to the settings surface. While focused,
    /// shortcut keys do not start sessions.
    pub fn set_settings_focused(&mut self, focused: bool) {
        self.settings_focused = focused;
    }

    /// Current state.
    pub fn state(&self) -> TrackerState {
        match &self.active {
            None => TrackerState::Idle,
            Some(active) if active.is_paused() => TrackerState::Paused,
            Some(_) => TrackerState::Running,
        }
    }

    /// The in-flight session.
    pub const fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Pauses completed during the current (or last) session.
    pub fn pause_intervals(&self) -> &[PauseInterval] {
        &self.pause_intervals
    }

    /// Mode of the scheduled tick, `None` while idle or paused.
    pub fn tick_mode(&self) -> Option<TickMode> {
        self.ticker.mode()
    }

    /// Handle a key press from the main surface.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting an implicitly ended session fails.
    pub fn handle_key(&mut self, key: char) -> Result<KeyOutcome, KeytimeError> {
        if self.settings_focused {
            return Ok(KeyOutcome::Ignored);
        }
        if key == PAUSE_KEY {
            return Ok(self
                .toggle_pause()
                .map_or(KeyOutcome::Ignored, KeyOutcome::PauseToggled));
        }

        let key = lowercase_key(key);
        if self.shortcuts.get(key).is_none() {
            return Ok(KeyOutcome::Ignored);
        }

        let ended = self.start_session(key)?;
        let category = self
            .active
            .as_ref()
            .map(|a| a.category.clone())
            .unwrap_or_default();
        Ok(KeyOutcome::Started { category, ended })
    }

    /// Start the session bound to `key`, ending any active one first.
    ///
    /// Returns the session that was implicitly ended.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is not registered, or a store error if
    /// persisting the previous session fails.
    pub fn start_session(&mut self, key: char) -> Result<Option<Session>, KeytimeError> {
        let key = lowercase_key(key);
        let target = self
            .shortcuts
            .get(key)
            .cloned()
            .ok_or_else(|| KeytimeError::NotFound(format!("no shortcut for key {key:?}")))?;

        let ended = self.end_session()?;

        let now = self.clock.instant();
        self.active = Some(ActiveSession::start(
            target.category.clone(),
            target.timer_minutes,
            self.clock.now(),
            now,
        ));
        self.pause_intervals.clear();

        let mode = if target.is_countdown() {
            TickMode::Countdown
        } else {
            TickMode::Stopwatch
        };
        self.ticker
            .start(mode, tick_period(self.preferences.show_milliseconds), now);

        tracing::info!(category = %target.category, timer = target.timer_minutes, "session started");
        Ok(ended)
    }

    /// Toggle between running and paused. Returns the new state, or `None`
    /// when idle.
    pub fn toggle_pause(&mut self) -> Option<TrackerState> {
        match self.state() {
            TrackerState::Idle => None,
            TrackerState::Running => {
                self.pause();
                Some(TrackerState::Paused)
            },
            TrackerState::Paused => {
                self.resume();
                Some(TrackerState::Running)
            },
        }
    }

    /// Freeze the active session and cancel the tick.
    pub fn pause(&mut self) {
        let now = self.clock.instant();
        let wall = self.clock.now();
        if let Some(active) = self.active.as_mut() {
            if !active.is_paused() {
                active.pause(now, wall);
                self.ticker.cancel();
                tracing::debug!(category = %active.category, "session paused");
            }
        }
    }

    /// Resume a paused session and reschedule the tick.
    pub fn resume(&mut self) {
        let now = self.clock.instant();
        let wall = self.clock.now();
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(interval) = active.resume(now, wall) else {
            return;
        };

        let mode = if active.is_countdown() {
            TickMode::Countdown
        } else {
            TickMode::Stopwatch
        };
        tracing::debug!(category = %active.category, paused_ms = interval.span().num_milliseconds(), "session resumed");
        self.pause_intervals.push(interval);
        self.ticker
            .start(mode, tick_period(self.preferences.show_milliseconds), now);
    }

    /// End the active session, if any, and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn end_session(&mut self) -> Result<Option<Session>, KeytimeError> {
        self.finish(false)
    }

    fn finish(&mut self, expired: bool) -> Result<Option<Session>, KeytimeError> {
        let Some(active) = self.active.as_ref() else {
            return Ok(None);
        };

        let now = self.clock.instant();
        let end_time = self.clock.now();

        let mut active_time = active.elapsed(now);
        if expired {
            if let Some(planned) = active.planned() {
                active_time = active_time.min(planned);
            }
        }

        let session = Session {
            category: active.category.clone(),
            start_time: active.started_at,
            end_time,
            duration_seconds: active_time.as_secs_f64(),
        };
        let pause_start = active.pause_started();

        // The active session stays in place until it is safely stored.
        append_sessions(&mut self.store, [session.clone()])?;

        self.active = None;
        self.ticker.cancel();
        if let Some(start) = pause_start {
            self.pause_intervals.push(PauseInterval { start, end: end_time });
        }

        tracing::info!(
            category = %session.category,
            duration = session.duration_seconds,
            expired,
            "session recorded"
        );
        Ok(Some(session))
    }

    /// Time until the next tick is due, `None` when no tick is scheduled.
    pub fn time_until_tick(&self) -> Option<Duration> {
        self.ticker.time_until_due(self.clock.instant())
    }

    /// Run a due tick.
    ///
    /// A countdown that reaches zero rings `alert` (when sound is enabled)
    /// and is then recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting an expired session fails.
    pub fn tick(&mut self, alert: &mut dyn Alert) -> Result<Option<TickEvent>, KeytimeError> {
        let now = self.clock.instant();
        if !self.ticker.fire(now) {
            return Ok(None);
        }

        let expired = self
            .active
            .as_ref()
            .and_then(|a| a.remaining(now))
            .is_some_and(|remaining| remaining.is_zero());

        if !expired {
            return Ok(Some(TickEvent::Refresh));
        }

        if self.preferences.play_sound {
            if let Err(e) = alert.ring() {
                tracing::warn!(error = %e, "failed to play expiry alert");
            }
        }

        Ok(self.finish(true)?.map(TickEvent::Expired))
    }

    /// What the timer display shows now.
    pub fn display(&self) -> TimerDisplay {
        let now = self.clock.instant();
        let tenths = self.preferences.show_milliseconds;

        match &self.active {
            None => {
                let clock = format_clock(0.0, tenths);
                TimerDisplay {
                    title: format!("{clock} - {IDLE_TITLE}"),
                    clock,
                    category: None,
                    state: TrackerState::Idle,
                }
            },
            Some(active) => {
                let shown = active
                    .remaining(now)
                    .unwrap_or_else(|| active.elapsed(now));
                let clock = format_clock(shown.as_secs_f64(), tenths);
                TimerDisplay {
                    title: format!("{clock} - {}", active.category),
                    clock,
                    category: Some(active.category.clone()),
                    state: self.state(),
                }
            },
        }
    }

    // ---------------------------------------------------------------------
    // Session log
    // ---------------------------------------------------------------------

    /// Reload the full session list from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the data is malformed.
    pub fn sessions(&self) -> Result<Vec<Session>, KeytimeError> {
        load_sessions(&self.store)
    }

    /// Delete the session at `index` (storage order).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the index is out of range.
    pub fn delete_session(&mut self, index: usize) -> Result<Session, KeytimeError> {
        let mut sessions = load_sessions(&self.store)?;
        if index >= sessions.len() {
            return Err(KeytimeError::NotFound(format!(
                "no session at index {index} ({} recorded)",
                sessions.len()
            )));
        }
        let removed = sessions.remove(index);
        save_sessions(&mut self.store, &sessions)?;
        tracing::info!(index, category = %removed.category, "session deleted");
        Ok(removed)
    }

    /// Delete every recorded session. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn clear_sessions(&mut self) -> Result<usize, KeytimeError> {
        let count = load_sessions(&self.store).map_or(0, |s| s.len());
        self.store.remove(keys::SESSIONS)?;
        tracing::info!(count, "all sessions cleared");
        Ok(count)
    }

    /// Append imported sessions. Returns the new total.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn import_sessions(&mut self, sessions: Vec<Session>) -> Result<usize, KeytimeError> {
        let added = sessions.len();
        let total = append_sessions(&mut self.store, sessions)?;
        tracing::info!(added, total, "sessions imported");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    #[derive(Default)]
    struct CountingAlert {
        rings: usize,
    }

    impl Alert for CountingAlert {
        fn ring(&mut self) -> std::io::Result<()> {
            self.rings += 1;
            Ok(())
        }
    }

    struct BrokenAlert;

    impl Alert for BrokenAlert {
        fn ring(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "no audio"))
        }
    }

    fn clock() -> ManualClock {
        ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap())
    }

    fn tracker(clock: &ManualClock) -> Tracker<MemoryStore, &ManualClock> {
        let mut tracker = Tracker::open(MemoryStore::new(), clock).unwrap();
        tracker.add_shortcut("w", "Work", 25).unwrap();
        tracker.add_shortcut("r", "Reading", 0).unwrap();
        tracker
    }

    /// Advance second by second, ticking like the event loop does.
    fn run_for(
        tracker: &mut Tracker<MemoryStore, &ManualClock>,
        clock: &ManualClock,
        secs: u64,
        alert: &mut dyn Alert,
    ) -> Vec<TickEvent> {
        let mut events = Vec::new();
        for _ in 0..secs {
            clock.advance_secs(1);
            if let Some(event) = tracker.tick(alert).unwrap() {
                events.push(event);
            }
        }
        events
    }

    #[test]
    fn test_starts_idle() {
        let clock = clock();
        let tracker = tracker(&clock);
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.tick_mode().is_none());
        assert_eq!(tracker.display().title, "00:00:00 - keytime");
    }

    #[test]
    fn test_registry_round_trips_through_store() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        tracker.add_shortcut("s", "Study", 50).unwrap();
        tracker.add_shortcut("w", "Writing", 0).unwrap();
        tracker.delete_shortcut('r').unwrap();
        let draft = tracker.edit_shortcut('s').unwrap().unwrap();
        tracker
            .add_shortcut("S", &draft.category, 45)
            .unwrap();

        let in_memory = tracker.shortcuts().clone();
        let reopened = Tracker::open(tracker.store().clone(), &clock).unwrap();
        assert_eq!(reopened.shortcuts(), &in_memory);
        assert_eq!(reopened.shortcuts().get('s').unwrap().timer_minutes, 45);
    }

    #[test]
    fn test_key_press_starts_session() {
        let clock = clock();
        let mut tracker = tracker(&clock);

        let outcome = tracker.handle_key('W').unwrap();
        assert_eq!(
            outcome,
            KeyOutcome::Started {
                category: "Work".to_string(),
                ended: None
            }
        );
        assert_eq!(tracker.state(), TrackerState::Running);
        assert_eq!(tracker.tick_mode(), Some(TickMode::Countdown));
        assert_eq!(tracker.display().clock, "00:25:00");

        assert_eq!(tracker.handle_key('z').unwrap(), KeyOutcome::Ignored);
    }

    #[test]
    fn test_settings_focus_blocks_shortcuts() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        tracker.set_settings_focused(true);

        assert_eq!(tracker.handle_key('w').unwrap(), KeyOutcome::Ignored);
        assert_eq!(tracker.state(), TrackerState::Idle);

        tracker.set_settings_focused(false);
        assert!(matches!(tracker.handle_key('w').unwrap(), KeyOutcome::Started { .. }));
    }

    #[test]
    fn test_switching_sessions_records_both() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        let mut alert = CountingAlert::default();

        tracker.handle_key('r').unwrap();
        run_for(&mut tracker, &clock, 30, &mut alert);

        let outcome = tracker.handle_key('w').unwrap();
        let KeyOutcome::Started { ended: Some(first), .. } = outcome else {
            panic!("expected the reading session to be closed");
        };
        assert_eq!(first.category, "Reading");
        assert!((first.duration_seconds - 30.0).abs() < 1e-9);
        assert_eq!(tracker.sessions().unwrap().len(), 1);

        run_for(&mut tracker, &clock, 10, &mut alert);
        tracker.end_session().unwrap();

        let sessions = tracker.sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].category, "Work");
        assert!((sessions[1].duration_seconds - 10.0).abs() < 1e-9);
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test]
    fn test_same_key_restarts_without_merging() {
        let clock = clock();
        let mut tracker = tracker(&clock);

        tracker.handle_key('r').unwrap();
        clock.advance_secs(5);
        tracker.handle_key('r').unwrap();
        clock.advance_secs(7);
        tracker.end_session().unwrap();

        let durations: Vec<f64> = tracker
            .sessions()
            .unwrap()
            .iter()
            .map(|s| s.duration_seconds)
            .collect();
        assert_eq!(durations, vec![5.0, 7.0]);
    }

    #[test]
    fn test_countdown_expires_at_planned_duration() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        tracker.add_shortcut("p", "Sprint", 1).unwrap();
        let mut alert = CountingAlert::default();

        tracker.handle_key('p').unwrap();
        let events = run_for(&mut tracker, &clock, 61, &mut alert);

        let expired: Vec<&Session> = events
            .iter()
            .filter_map(|e| match e {
                TickEvent::Expired(s) => Some(s),
                TickEvent::Refresh => None,
            })
            .collect();
        assert_eq!(expired.len(), 1);
        assert!((expired[0].duration_seconds - 60.0).abs() < 1e-9);
        assert_eq!(alert.rings, 1);
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(tracker.sessions().unwrap().len(), 1);
    }

    #[test]
    fn test_paused_countdown_records_active_time_only() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        tracker.add_shortcut("p", "Sprint", 1).unwrap();
        let mut alert = CountingAlert::default();

        tracker.handle_key('p').unwrap();
        run_for(&mut tracker, &clock, 20, &mut alert);

        assert_eq!(tracker.handle_key(' ').unwrap(), KeyOutcome::PauseToggled(TrackerState::Paused));
        assert!(tracker.tick_mode().is_none());
        // Paused for 45 seconds: no ticks, no expiry
        assert!(run_for(&mut tracker, &clock, 45, &mut alert).is_empty());
        assert_eq!(tracker.display().clock, "00:00:40");

        assert_eq!(tracker.toggle_pause(), Some(TrackerState::Running));
        let events = run_for(&mut tracker, &clock, 40, &mut alert);
        let Some(TickEvent::Expired(session)) = events.last() else {
            panic!("countdown should expire after the remaining 40s");
        };

        assert!((session.duration_seconds - 60.0).abs() < 1e-9);
        assert!((session.span_seconds() - 105.0).abs() < 1e-9);
        assert_eq!(session.paused_seconds(), Some(45.0));
    }

    #[test]
    fn test_pause_resume_accounts_for_wall_time() {
        let clock = clock();
        let mut tracker = tracker(&clock);

        tracker.handle_key('r').unwrap();
        clock.advance_secs(10);
        tracker.pause();
        clock.advance_secs(5);
        tracker.resume();
        clock.advance_secs(20);
        tracker.pause();
        clock.advance_secs(8);
        tracker.resume();
        clock.advance_secs(3);
        tracker.pause();
        clock.advance_secs(4);
        let session = tracker.end_session().unwrap().unwrap();

        let paused: i64 = tracker
            .pause_intervals()
            .iter()
            .map(|p| p.span().num_seconds())
            .sum();
        assert_eq!(tracker.pause_intervals().len(), 3);
        assert!((session.duration_seconds - 33.0).abs() < 1e-9);
        assert_eq!(paused, 17);
        assert!((session.span_seconds() - (session.duration_seconds + 17.0)).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_pause_when_idle_is_noop() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        assert_eq!(tracker.toggle_pause(), None);
        assert_eq!(tracker.handle_key(' ').unwrap(), KeyOutcome::Ignored);
    }

    #[test]
    fn test_sound_disabled_or_broken_does_not_stop_expiry() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        tracker.add_shortcut("p", "Sprint", 1).unwrap();

        tracker.handle_key('p').unwrap();
        let events = run_for(&mut tracker, &clock, 60, &mut BrokenAlert);
        assert!(matches!(events.last(), Some(TickEvent::Expired(_))));

        tracker.set_play_sound(false).unwrap();
        let mut alert = CountingAlert::default();
        tracker.handle_key('p').unwrap();
        run_for(&mut tracker, &clock, 60, &mut alert);
        assert_eq!(alert.rings, 0);
        assert_eq!(tracker.sessions().unwrap().len(), 2);
    }

    #[test]
    fn test_milliseconds_display_and_tick_rate() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        tracker.set_show_milliseconds(true).unwrap();

        tracker.handle_key('r').unwrap();
        assert_eq!(tracker.time_until_tick(), Some(Duration::from_millis(100)));

        clock.advance(Duration::from_millis(1250));
        let display = tracker.display();
        assert_eq!(display.clock, "00:00:01.2");
        assert_eq!(display.title, "00:00:01.2 - Reading");

        tracker.set_show_milliseconds(false).unwrap();
        assert_eq!(tracker.time_until_tick(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_unknown_shortcut_start_is_not_found() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        assert!(matches!(tracker.start_session('q'), Err(KeytimeError::NotFound(_))));
    }

    #[test]
    fn test_delete_and_clear_sessions() {
        let clock = clock();
        let mut tracker = tracker(&clock);

        for _ in 0..3 {
            tracker.handle_key('r').unwrap();
            clock.advance_secs(60);
        }
        tracker.end_session().unwrap();
        assert_eq!(tracker.sessions().unwrap().len(), 3);

        let removed = tracker.delete_session(1).unwrap();
        assert_eq!(removed.category, "Reading");
        assert_eq!(tracker.sessions().unwrap().len(), 2);
        assert!(matches!(tracker.delete_session(9), Err(KeytimeError::NotFound(_))));

        assert_eq!(tracker.clear_sessions().unwrap(), 2);
        assert!(tracker.sessions().unwrap().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_session_running() {
        use crate::storage::MockKeyValueStore;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let disk_full = Arc::new(AtomicBool::new(true));
        let failing = Arc::clone(&disk_full);

        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_set().returning(move |key, _| {
            if key == keys::SESSIONS && failing.load(Ordering::SeqCst) {
                Err(KeytimeError::Database("disk full".to_string()))
            } else {
                Ok(())
            }
        });

        let clock = clock();
        let mut tracker = Tracker::open(store, &clock).unwrap();
        tracker.add_shortcut("w", "Work", 0).unwrap();
        tracker.start_session('w').unwrap();
        clock.advance_secs(30);

        assert!(matches!(tracker.end_session(), Err(KeytimeError::Database(_))));
        assert_eq!(tracker.state(), TrackerState::Running);
        assert_eq!(tracker.active().map(|a| a.category.as_str()), Some("Work"));
        assert!(tracker.time_until_tick().is_some());

        disk_full.store(false, Ordering::SeqCst);
        let saved = tracker.end_session().unwrap().unwrap();
        assert_eq!(saved.category, "Work");
        assert!((saved.duration_seconds - 30.0).abs() < 1e-6);
        assert_eq!(tracker.state(), TrackerState::Idle);
    }
}
