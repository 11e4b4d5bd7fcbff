//! Time sources.
//!
//! Elapsed-time arithmetic uses the monotonic [`Clock::instant`]; timestamps
//! written to storage and shown to the user come from [`Clock::now`].

use std::cell::Cell;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// A source of monotonic instants and wall-clock timestamps.
pub trait Clock {
    /// Current monotonic instant.
    fn instant(&self) -> Instant;

    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Both the monotonic and the wall-clock readings advance together.
#[derive(Debug)]
pub struct ManualClock {
    base_instant: Instant,
    base_time: DateTime<Utc>,
    offset: Cell<Duration>,
}

impl ManualClock {
    /// Create a manual clock whose wall-clock reading starts at `start`.
    #[must_use]
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            base_instant: Instant::now(),
            base_time: start,
            offset: Cell::new(Duration::ZERO),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn instant(&self) -> Instant {
        self.base_instant + self.offset.get()
    }

    fn now(&self) -> DateTime<Utc> {
        let offset = chrono::Duration::from_std(self.offset.get()).unwrap_or_default();
        self.base_time + offset
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn instant(&self) -> Instant {
        (**self).instant()
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
