//! Core abstractions for keytime.
//!
//! Time sources and the date/duration helpers used across features.

mod clock;
mod datetime;

pub use clock::{Clock, ManualClock, SystemClock};
pub use datetime::{format_clock, format_hms, format_ms, local_day, parse_day};
