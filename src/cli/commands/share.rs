//! Share link commands.

use colored::Colorize;
use serde_json::json;

use crate::cli::args::{OutputFormat, ShareCommands};
use crate::core::Clock;
use crate::error::KeytimeError;
use crate::features::share::{apply_share_link, share_url};
use crate::features::tracking::Tracker;
use crate::output::to_json;
use crate::storage::KeyValueStore;

/// Print a share link, or apply one.
///
/// A link that cannot be read is reported but is not an error; the
/// shortcuts stay as they were.
///
/// # Errors
///
/// Returns an error if the registry cannot be serialized.
pub fn share<S: KeyValueStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    cmd: Option<ShareCommands>,
    base_url: &str,
    format: OutputFormat,
) -> Result<String, KeytimeError> {
    match cmd.unwrap_or(ShareCommands::Url) {
        ShareCommands::Url => {
            let url = share_url(base_url, tracker.shortcuts())?;
            match format {
                OutputFormat::Json => to_json(&json!({
                    "count": tracker.shortcuts().len(),
                    "url": url,
                })),
                OutputFormat::Pretty => Ok(url),
            }
        },
        ShareCommands::Apply { link } => {
            let applied = apply_share_link(tracker, &link);
            match format {
                OutputFormat::Json => to_json(&json!({
                    "applied": applied.is_some(),
                    "count": applied.unwrap_or_else(|| tracker.shortcuts().len()),
                })),
                OutputFormat::Pretty => Ok(applied.map_or_else(
                    || format!("{} shortcuts unchanged", "Link could not be read;".yellow()),
                    |count| format!("{} {count} shortcuts from link", "Loaded".green()),
                )),
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{clock, tracker};

    #[test]
    fn test_share_url_then_apply_elsewhere() {
        let clock = clock();
        let mut source = tracker(&clock);
        let url = share(&mut source, None, "https://keytime.app/", OutputFormat::Pretty).unwrap();

        let mut target = Tracker::open(crate::storage::MemoryStore::new(), &clock).unwrap();
        let output = share(
            &mut target,
            Some(ShareCommands::Apply { link: url }),
            "https://keytime.app/",
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["applied"], true);
        assert_eq!(target.shortcuts(), source.shortcuts());
    }

    #[test]
    fn test_apply_garbage_keeps_shortcuts() {
        let clock = clock();
        let mut tracker = tracker(&clock);
        let before = tracker.shortcuts().clone();

        let output = share(
            &mut tracker,
            Some(ShareCommands::Apply {
                link: "https://keytime.app/?shortcuts=bm90IGpzb24".to_string(),
            }),
            "https://keytime.app/",
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["applied"], false);
        assert_eq!(value["count"], 2);
        assert_eq!(tracker.shortcuts(), &before);
    }
}
