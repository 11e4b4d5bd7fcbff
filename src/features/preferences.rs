//! User preferences kept in the key/value store.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::KeytimeError;
use crate::storage::{keys, KeyValueStore};

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light text on a dark background.
    Dark,
    /// Dark text on a light background.
    Light,
}

impl Theme {
    /// Parse the stored value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Guess the terminal's theme from `COLORFGBG` (`"fg;bg"`).
    ///
    /// Background colors 7 and 15 are light; anything else, or no hint at
    /// all, is dark.
    #[must_use]
    pub fn from_terminal_hint(colorfgbg: Option<&str>) -> Self {
        let background = colorfgbg
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());

        match background {
            Some(7 | 15) => Self::Light,
            _ => Self::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preference values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preferences {
    /// Show tenths of a second and tick at 10 Hz.
    pub show_milliseconds: bool,
    /// Ring the terminal bell when a countdown expires.
    pub play_sound: bool,
    /// Whether the welcome overlay has been dismissed before.
    pub has_visited: bool,
    /// Explicit theme choice, `None` to follow the terminal.
    pub theme: Option<Theme>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_milliseconds: false,
            play_sound: true,
            has_visited: false,
            theme: None,
        }
    }
}

impl Preferences {
    /// Load preferences, falling back to defaults for absent or unreadable values.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, KeytimeError> {
        let defaults = Self::default();
        Ok(Self {
            show_milliseconds: read_bool(store, keys::SHOW_MILLISECONDS)?
                .unwrap_or(defaults.show_milliseconds),
            play_sound: read_bool(store, keys::PLAY_SOUND)?.unwrap_or(defaults.play_sound),
            has_visited: store.get(keys::HAS_VISITED)?.is_some(),
            theme: store.get(keys::THEME)?.as_deref().and_then(Theme::parse),
        })
    }

    /// The theme to render with, resolving "follow the terminal".
    #[must_use]
    pub fn effective_theme(&self) -> Theme {
        self.theme.unwrap_or_else(|| {
            Theme::from_terminal_hint(std::env::var("COLORFGBG").ok().as_deref())
        })
    }

    /// Persist the milliseconds toggle.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn set_show_milliseconds(&mut self, store: &mut dyn KeyValueStore, on: bool) -> Result<(), KeytimeError> {
        store.set(keys::SHOW_MILLISECONDS, bool_text(on))?;
        self.show_milliseconds = on;
        Ok(())
    }

    /// Persist the sound toggle.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn set_play_sound(&mut self, store: &mut dyn KeyValueStore, on: bool) -> Result<(), KeytimeError> {
        store.set(keys::PLAY_SOUND, bool_text(on))?;
        self.play_sound = on;
        Ok(())
    }

    /// Persist the theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn set_theme(&mut self, store: &mut dyn KeyValueStore, theme: Theme) -> Result<(), KeytimeError> {
        store.set(keys::THEME, theme.as_str())?;
        self.theme = Some(theme);
        Ok(())
    }

    /// Record that onboarding has been seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn mark_visited(&mut self, store: &mut dyn KeyValueStore) -> Result<(), KeytimeError> {
        if !self.has_visited {
            store.set(keys::HAS_VISITED, "true")?;
            self.has_visited = true;
        }
        Ok(())
    }
}

const fn bool_text(on: bool) -> &'static str {
    if on {
        "true"
    } else {
        "false"
    }
}

fn read_bool(store: &dyn KeyValueStore, key: &str) -> Result<Option<bool>, KeytimeError> {
    Ok(store.get(key)?.map(|v| v.trim() == "true"))
}
