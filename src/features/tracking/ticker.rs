//! The display-refresh tick.
//!
//! At most one tick is scheduled at a time. Starting a tick replaces any
//! previous one; idle and paused trackers have none.

use std::time::{Duration, Instant};

/// What the tick drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// Counting down towards expiry.
    Countdown,
    /// Counting up with no end.
    Stopwatch,
}

#[derive(Debug, Clone, Copy)]
struct Tick {
    mode: TickMode,
    period: Duration,
    next_due: Instant,
}

/// Tick period for the given display precision: 1 s, or 100 ms with tenths.
#[must_use]
pub const fn tick_period(show_tenths: bool) -> Duration {
    if show_tenths {
        Duration::from_millis(100)
    } else {
        Duration::from_secs(1)
    }
}

/// Holder of the single scheduled tick.
#[derive(Debug, Default)]
pub struct Ticker {
    current: Option<Tick>,
}

impl Ticker {
    /// Schedule a tick, cancelling any previous one.
    pub fn start(&mut self, mode: TickMode, period: Duration, now: Instant) {
        self.current = Some(Tick {
            mode,
            period,
            next_due: now + period,
        });
    }

    /// Cancel the scheduled tick, if any.
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Mode of the scheduled tick.
    #[must_use]
    pub fn mode(&self) -> Option<TickMode> {
        self.current.map(|t| t.mode)
    }

    /// Period of the scheduled tick.
    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        self.current.map(|t| t.period)
    }

    /// Whether a tick is scheduled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Consume a due tick. Returns `false` when nothing is due.
    ///
    /// Missed ticks are coalesced into one.
    pub fn fire(&mut self, now: Instant) -> bool {
        let Some(tick) = self.current.as_mut() else {
            return false;
        };
        if now < tick.next_due {
            return false;
        }

        tick.next_due += tick.period;
        if tick.next_due <= now {
            tick.next_due = now + tick.period;
        }
        true
    }

    /// How long until the next tick is due.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.current
            .map(|t| t.next_due.saturating_duration_since(now))
    }
}
