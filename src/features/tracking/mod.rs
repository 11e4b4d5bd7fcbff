//! Session tracking: the Idle/Running/Paused state machine and its log.

pub mod active;
pub mod alert;
pub mod session;
pub mod ticker;
pub mod tracker;

pub use active::{ActiveSession, PauseInterval, TrackerState};
pub use alert::{Alert, Silent, TerminalBell};
pub use session::{append_sessions, load_sessions, save_sessions, Session};
pub use ticker::{tick_period, TickMode, Ticker};
pub use tracker::{KeyOutcome, TickEvent, TimerDisplay, Tracker, IDLE_TITLE};
