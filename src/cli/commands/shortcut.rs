//! Shortcut management commands.

use colored::Colorize;
use serde_json::json;

use crate::cli::args::{OutputFormat, ShortcutCommands};
use crate::core::Clock;
use crate::error::KeytimeError;
use crate::features::shortcuts::{normalize_key, Shortcut};
use crate::features::tracking::Tracker;
use crate::output::{format_shortcut_saved_pretty, format_shortcuts, to_json};
use crate::storage::KeyValueStore;

/// Execute shortcut subcommands.
///
/// # Errors
///
/// Returns an error if a key is invalid, missing, or the store fails.
pub fn shortcut<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    cmd: ShortcutCommands,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    match cmd {
        ShortcutCommands::Add { key, category, timer } => {
            let key = tracker.add_shortcut(&key, &category, timer)?;
            saved(tracker, key, format)
        },
        ShortcutCommands::List => {
            let shortcuts: Vec<Shortcut> = tracker.shortcuts().iter().collect();
            format_shortcuts(&shortcuts, format)
        },
        ShortcutCommands::Delete { key } => {
            let key = normalize_key(&key)?;
            if !tracker.delete_shortcut(key)? {
                return Err(KeytimeError::NotFound(format!("Shortcut '{key}'")));
            }
            match format {
                OutputFormat::Json => to_json(&json!({ "status": "deleted", "key": key })),
                OutputFormat::Pretty => Ok(format!("{} shortcut [{key}]", "Deleted".red())),
            }
        },
        ShortcutCommands::Edit {
            key,
            new_key,
            category,
            timer,
        } => {
            let key = normalize_key(&key)?;
            let draft = tracker
                .edit_shortcut(key)?
                .ok_or_else(|| KeytimeError::NotFound(format!("Shortcut '{key}'")))?;

            let target_key = new_key.unwrap_or_else(|| draft.key.to_string());
            let category = category.unwrap_or_else(|| draft.category.clone());
            let timer = timer.unwrap_or(draft.timer_minutes);

            match tracker.add_shortcut(&target_key, &category, timer) {
                Ok(saved_key) => saved(tracker, saved_key, format),
                Err(e) => {
                    // Put the original back so a bad edit loses nothing
                    tracker.add_shortcut(&draft.key.to_string(), &draft.category, draft.timer_minutes)?;
                    Err(e)
                },
            }
        },
    }
}

fn saved<S: KeyValueStore, C: Clock>(
    tracker: &Tracker<S, C>,
    key: char,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    let shortcut = tracker
        .shortcuts()
        .iter()
        .find(|s| s.key == key)
        .ok_or_else(|| KeytimeError::NotFound(format!("Shortcut '{key}'")))?;

    match format {
        OutputFormat::Json => to_json(&json!({ "status": "saved", "shortcut": shortcut })),
        OutputFormat::Pretty => Ok(format_shortcut_saved_pretty(&shortcut)),
    }
}
