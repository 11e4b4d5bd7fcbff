//! Completed sessions and the persisted session list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::KeytimeError;
use crate::storage::{keys, KeyValueStore};

/// One completed, timed interval of activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Activity category.
    pub category: String,
    /// Wall-clock start.
    pub start_time: DateTime<Utc>,
    /// Wall-clock end.
    pub end_time: DateTime<Utc>,
    /// Active time in seconds, excluding pauses.
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
}

impl Session {
    /// Wall-clock span between start and end, in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn span_seconds(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }

    /// Time the session spent paused, inferred as span minus active time.
    ///
    /// Returns `None` when the difference is under one second.
    #[must_use]
    pub fn paused_seconds(&self) -> Option<f64> {
        let paused = self.span_seconds() - self.duration_seconds;
        (paused >= 1.0).then_some(paused)
    }
}

/// Load the full session list. A missing key is an empty list.
///
/// # Errors
///
/// Returns an error if the store fails or the stored value is malformed.
pub fn load_sessions(store: &dyn KeyValueStore) -> Result<Vec<Session>, KeytimeError> {
    match store.get(keys::SESSIONS)? {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| KeytimeError::Parse(format!("invalid session data: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Overwrite the full session list.
///
/// # Errors
///
/// Returns an error if serialization or the store fails.
pub fn save_sessions(store: &mut dyn KeyValueStore, sessions: &[Session]) -> Result<(), KeytimeError> {
    let json = serde_json::to_string(sessions)?;
    store.set(keys::SESSIONS, &json)
}

/// Append sessions to the stored list (read-modify-write).
///
/// Returns the new total.
///
/// # Errors
///
/// Returns an error if the store fails or the stored value is malformed.
pub fn append_sessions(
    store: &mut dyn KeyValueStore,
    new_sessions: impl IntoIterator<Item = Session>,
) -> Result<usize, KeytimeError> {
    let mut sessions = load_sessions(store)?;
    sessions.extend(new_sessions);
    save_sessions(store, &sessions)?;
    Ok(sessions.len())
}
