//! Keyboard shortcuts that start tracking sessions.

pub mod registry;

pub use registry::{lowercase_key, normalize_key, Shortcut, ShortcutRegistry, ShortcutTarget, PAUSE_KEY};
