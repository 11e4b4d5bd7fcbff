//! The session currently being timed.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerState {
    /// No session is active.
    Idle,
    /// A session is counting.
    Running,
    /// A session is frozen.
    Paused,
}

impl std::fmt::Display for TrackerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// A completed pause, kept in memory for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseInterval {
    /// When the pause began.
    pub start: DateTime<Utc>,
    /// When it ended.
    pub end: DateTime<Utc>,
}

impl PauseInterval {
    /// Length of the pause.
    #[must_use]
    pub fn span(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// The single in-flight session.
///
/// Elapsed time is measured against a virtual monotonic `anchor`: pausing
/// freezes the elapsed value, resuming moves the anchor so that
/// `now - anchor` continues from where it stopped.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    /// Activity category.
    pub category: String,
    /// Countdown length in minutes, 0 for stopwatch mode.
    pub timer_minutes: u32,
    /// Wall-clock start, as persisted.
    pub started_at: DateTime<Utc>,
    anchor: Instant,
    paused_accumulated: Duration,
    pause_started: Option<DateTime<Utc>>,
}

impl ActiveSession {
    pub(crate) fn start(
        category: String,
        timer_minutes: u32,
        started_at: DateTime<Utc>,
        anchor: Instant,
    ) -> Self {
        Self {
            category,
            timer_minutes,
            started_at,
            anchor,
            paused_accumulated: Duration::ZERO,
            pause_started: None,
        }
    }

    /// Whether the session is frozen.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.pause_started.is_some()
    }

    /// Whether the session counts down.
    #[must_use]
    pub const fn is_countdown(&self) -> bool {
        self.timer_minutes > 0
    }

    /// Planned length of a countdown.
    #[must_use]
    pub fn planned(&self) -> Option<Duration> {
        self.is_countdown()
            .then(|| Duration::from_secs(u64::from(self.timer_minutes) * 60))
    }

    /// Active time so far.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        if self.is_paused() {
            self.paused_accumulated
        } else {
            now.saturating_duration_since(self.anchor)
        }
    }

    /// Time left on a countdown, never negative.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.planned()
            .map(|planned| planned.saturating_sub(self.elapsed(now)))
    }

    /// When the current pause began.
    #[must_use]
    pub const fn pause_started(&self) -> Option<DateTime<Utc>> {
        self.pause_started
    }

    pub(crate) fn pause(&mut self, now: Instant, wall: DateTime<Utc>) {
        if !self.is_paused() {
            self.paused_accumulated = now.saturating_duration_since(self.anchor);
            self.pause_started = Some(wall);
        }
    }

    /// Resume and return the finished pause interval.
    pub(crate) fn resume(&mut self, now: Instant, wall: DateTime<Utc>) -> Option<PauseInterval> {
        let start = self.pause_started.take()?;
        self.anchor = now.checked_sub(self.paused_accumulated).unwrap_or(now);
        Some(PauseInterval { start, end: wall })
    }
}
