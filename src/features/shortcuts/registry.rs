//! Shortcut registry.
//!
//! Maps single-character keys to an activity category and an optional
//! countdown length. Insertion order is preserved for display; overwriting a
//! key keeps its position.

use serde::{Deserialize, Serialize};

use crate::error::KeytimeError;

/// Key that toggles pause and therefore cannot be a shortcut.
pub const PAUSE_KEY: char = ' ';

/// What a shortcut starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutTarget {
    /// Activity category.
    pub category: String,
    /// Countdown length in minutes, 0 for stopwatch mode.
    #[serde(rename = "timer", default)]
    pub timer_minutes: u32,
}

impl ShortcutTarget {
    /// Whether this shortcut runs a countdown.
    #[must_use]
    pub const fn is_countdown(&self) -> bool {
        self.timer_minutes > 0
    }

    /// Short mode label, `25m` or `stopwatch`.
    #[must_use]
    pub fn mode_label(&self) -> String {
        if self.is_countdown() {
            format!("{}m", self.timer_minutes)
        } else {
            "stopwatch".to_string()
        }
    }
}

/// A shortcut with its key, as listed or handed out for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    /// Trigger key.
    pub key: char,
    /// Activity category.
    pub category: String,
    /// Countdown length in minutes, 0 for stopwatch mode.
    pub timer_minutes: u32,
}

impl Shortcut {
    fn from_entry(key: char, target: &ShortcutTarget) -> Self {
        Self {
            key,
            category: target.category.clone(),
            timer_minutes: target.timer_minutes,
        }
    }
}

/// Normalize user input into a shortcut key.
///
/// The key must be exactly one character and not the pause key. Letters are
/// lower-cased.
///
/// # Errors
///
/// Returns `KeytimeError::InvalidShortcut` for empty, multi-character or
/// reserved keys.
pub fn normalize_key(input: &str) -> Result<char, KeytimeError> {
    let mut chars = input.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(KeytimeError::InvalidShortcut(format!(
            "shortcut must be a single character, got {input:?}"
        )));
    };

    if c == PAUSE_KEY {
        return Err(KeytimeError::InvalidShortcut(
            "the space bar is reserved for pause and cannot be a shortcut".to_string(),
        ));
    }
    if c.is_control() {
        return Err(KeytimeError::InvalidShortcut(format!(
            "control character {c:?} cannot be a shortcut"
        )));
    }

    Ok(lowercase_key(c))
}

/// Lower-case a key press the same way registered keys are stored.
#[must_use]
pub fn lowercase_key(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Ordered mapping from key to shortcut target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutRegistry {
    entries: Vec<(char, ShortcutTarget)>,
}

impl ShortcutRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted form, an array of `[key, {category, timer}]` pairs.
    ///
    /// Later duplicates of a key overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid pair array.
    pub fn from_json(json: &str) -> Result<Self, KeytimeError> {
        let pairs: Vec<(char, ShortcutTarget)> = serde_json::from_str(json)
            .map_err(|e| KeytimeError::Parse(format!("invalid shortcut data: {e}")))?;

        let mut registry = Self::new();
        for (key, target) in pairs {
            registry.insert(key, target);
        }
        Ok(registry)
    }

    /// Serialize to the persisted pair-array form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, KeytimeError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Add or overwrite a shortcut.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the category is blank.
    pub fn add(&mut self, key: &str, category: &str, timer_minutes: u32) -> Result<char, KeytimeError> {
        let key = normalize_key(key)?;
        let category = category.trim();
        if category.is_empty() {
            return Err(KeytimeError::InvalidShortcut(
                "category must not be empty".to_string(),
            ));
        }

        self.insert(
            key,
            ShortcutTarget {
                category: category.to_string(),
                timer_minutes,
            },
        );
        Ok(key)
    }

    fn insert(&mut self, key: char, target: ShortcutTarget) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = target;
        } else {
            self.entries.push((key, target));
        }
    }

    /// Remove a shortcut. Returns whether it existed.
    pub fn remove(&mut self, key: char) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.len() != before
    }

    /// Remove a shortcut and hand it back for editing.
    pub fn take_for_edit(&mut self, key: char) -> Option<Shortcut> {
        let position = self.entries.iter().position(|(k, _)| *k == key)?;
        let (key, target) = self.entries.remove(position);
        Some(Shortcut::from_entry(key, &target))
    }

    /// Look up a shortcut.
    #[must_use]
    pub fn get(&self, key: char) -> Option<&ShortcutTarget> {
        self.entries
            .iter()
            .find_map(|(k, target)| (*k == key).then_some(target))
    }

    /// All shortcuts in display order.
    pub fn iter(&self) -> impl Iterator<Item = Shortcut> + '_ {
        self.entries
            .iter()
            .map(|(key, target)| Shortcut::from_entry(*key, target))
    }

    /// Distinct categories in display order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for (_, target) in &self.entries {
            if !categories.contains(&target.category) {
                categories.push(target.category.clone());
            }
        }
        categories
    }

    /// Number of shortcuts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
