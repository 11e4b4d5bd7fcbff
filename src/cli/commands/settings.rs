//! Preference command.

use serde_json::json;

use crate::cli::args::{OutputFormat, SettingsArgs};
use crate::core::Clock;
use crate::error::KeytimeError;
use crate::features::tracking::Tracker;
use crate::output::{format_preferences_pretty, to_json};
use crate::storage::KeyValueStore;

/// Apply any changed preferences, then show them all.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn settings<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    args: &SettingsArgs,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    if let Some(on) = args.show_milliseconds {
        tracker.set_show_milliseconds(on)?;
    }
    if let Some(on) = args.play_sound {
        tracker.set_play_sound(on)?;
    }
    if let Some(theme) = args.theme {
        tracker.set_theme(theme)?;
    }
    if args.has_changes() {
        tracing::info!("preferences updated from command line");
    }

    let preferences = tracker.preferences();
    match format {
        OutputFormat::Json => to_json(&json!({
            "show_milliseconds": preferences.show_milliseconds,
            "play_sound": preferences.play_sound,
            "theme": preferences.theme,
            "effective_theme": preferences.effective_theme(),
        })),
        OutputFormat::Pretty => Ok(format_preferences_pretty(preferences)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{clock, tracker};
    use crate::features::preferences::Theme;

    #[test]
    fn test_settings_show_defaults() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        let args = SettingsArgs {
            show_milliseconds: None,
            play_sound: None,
            theme: None,
        };
        let output = settings(&mut tracker, &args, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["show_milliseconds"], false);
        assert_eq!(value["play_sound"], true);
        assert!(value["theme"].is_null());
    }

    #[test]
    fn test_settings_update_persists() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        let args = SettingsArgs {
            show_milliseconds: Some(true),
            play_sound: Some(false),
            theme: Some(Theme::Light),
        };
        settings(&mut tracker, &args, OutputFormat::Pretty).unwrap();

        let reopened = Tracker::open(tracker.store().clone(), &clock).unwrap();
        assert!(reopened.preferences().show_milliseconds);
        assert!(!reopened.preferences().play_sound);
        assert_eq!(reopened.preferences().theme, Some(Theme::Light));
    }
}
