//! Storage layer for keytime.
//!
//! Persistence is a key/value port with two implementations:
//! - `SqliteStore`, a `kv` table in `~/.keytime/keytime.db`
//! - `MemoryStore`, for tests and dry runs

mod database;
mod kv;
mod migrations;

pub use database::Database;
#[cfg(test)]
pub use kv::MockKeyValueStore;
pub use kv::{KeyValueStore, MemoryStore, SqliteStore};

/// Keys under which keytime persists its state.
pub mod keys {
    /// Shortcut registry, `[[key, {category, timer}], ...]`.
    pub const SHORTCUTS: &str = "shortcuts";
    /// Completed sessions, `[{category, startTime, endTime, duration}, ...]`.
    pub const SESSIONS: &str = "sessions";
    /// `"true"` / `"false"`.
    pub const SHOW_MILLISECONDS: &str = "showMilliseconds";
    /// `"true"` / `"false"`.
    pub const PLAY_SOUND: &str = "playSound";
    /// Presence sentinel for first-run onboarding.
    pub const HAS_VISITED: &str = "hasVisited";
    /// `"dark"` / `"light"`.
    pub const THEME: &str = "theme";
}
