//! Command implementations for keytime.
//!
//! Each command takes the tracker it operates on and returns the text to
//! print, so the same code runs against the `SQLite` store and test stores.

mod completions;
mod sessions;
mod settings;
mod share;
mod shortcut;
mod stats;
mod transfer;

pub use completions::completions;
pub use sessions::{clear, delete, log};
pub use settings::settings;
pub use share::share;
pub use shortcut::shortcut;
pub use stats::stats;
pub use transfer::{export, import};

use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDate};

use crate::config::Paths;
use crate::core::{local_day, parse_day, Clock, SystemClock};
use crate::error::KeytimeError;
use crate::features::tracking::Tracker;
use crate::storage::{Database, KeyValueStore, SqliteStore};

/// Tracker over the on-disk store, as used by every command.
pub type AppTracker = Tracker<SqliteStore, SystemClock>;

/// Open the database under `paths` and load the tracker.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or holds malformed data.
pub fn open_tracker(paths: &Paths) -> Result<AppTracker, KeytimeError> {
    let db = Database::open(paths)?;
    Tracker::open(SqliteStore::new(db), SystemClock)
}

/// Today in the local timezone, per the tracker's clock.
pub fn today<S: KeyValueStore, C: Clock>(tracker: &Tracker<S, C>) -> NaiveDate {
    local_day(&tracker.now(), &Local)
}

/// Resolve a `--day` argument against the tracker's today.
///
/// # Errors
///
/// Returns `KeytimeError::Parse` if the expression is not understood.
pub fn resolve_day<S: KeyValueStore, C: Clock>(
    tracker: &Tracker<S, C>,
    expr: &str,
) -> Result<NaiveDate, KeytimeError> {
    parse_day(expr, today(tracker)).ok_or_else(|| {
        KeytimeError::Parse(format!(
            "Unknown day '{expr}'. Use today, yesterday, -N or YYYY-MM-DD"
        ))
    })
}

/// Ask a yes/no question on `output`, reading the answer from `input`.
///
/// Only `y` or `yes` counts as yes.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or written.
pub fn confirm_with<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool, KeytimeError> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Ask a yes/no question on the terminal.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or written.
pub fn confirm(question: &str) -> Result<bool, KeytimeError> {
    confirm_with(question, &mut io::stdin().lock(), &mut io::stdout())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};

    use crate::core::ManualClock;
    use crate::features::tracking::Tracker;
    use crate::storage::MemoryStore;

    pub fn clock() -> ManualClock {
        ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap())
    }

    pub fn tracker(clock: &ManualClock) -> Tracker<MemoryStore, &ManualClock> {
        let mut tracker = Tracker::open(MemoryStore::new(), clock).unwrap();
        tracker.add_shortcut("w", "Work", 25).unwrap();
        tracker.add_shortcut("r", "Reading", 0).unwrap();
        tracker
    }

    /// Record one `Reading` session of `secs` seconds.
    pub fn record(tracker: &mut Tracker<MemoryStore, &ManualClock>, clock: &ManualClock, secs: u64) {
        tracker.start_session('r').unwrap();
        clock.advance_secs(secs);
        tracker.end_session().unwrap();
    }
}
