use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::features::preferences::Theme;

#[derive(Parser)]
#[command(name = "keytime")]
#[command(about = "Keyboard-driven time tracker for the terminal")]
#[command(long_about = "keytime - Keyboard-driven time tracker

Bind single keys to activity categories, then press a key to start timing.
A shortcut with a timer counts down and rings when it runs out; one
without counts up until you stop it or start something else.

QUICK START:
  keytime shortcut add w Work --timer 25   Bind 'w' to a 25 minute countdown
  keytime shortcut add r Reading           Bind 'r' to a stopwatch
  keytime                                  Open the timer and press 'w'
  keytime stats                            Today's totals and a 14 day chart

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  keytime <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from config.yaml.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Data directory (default: ~/.keytime)
    #[arg(long, global = true, env = "KEYTIME_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Command to run; opens the timer when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive timer
    ///
    /// Press a shortcut key to start a session, Space to pause,
    /// Enter to stop. F1 shows every key binding.
    ///
    /// # Examples
    ///
    ///   keytime tui
    ///   keytime tui --link "https://keytime.app/?shortcuts=..."
    #[command(alias = "t")]
    Tui(TuiArgs),

    /// Manage shortcut keys
    ///
    /// # Examples
    ///
    ///   keytime shortcut add w Work --timer 25
    ///   keytime shortcut list
    ///   keytime shortcut edit w --timer 50
    ///   keytime shortcut delete w
    #[command(alias = "sc")]
    Shortcut(ShortcutArgs),

    /// Show recorded sessions, newest first
    ///
    /// # Examples
    ///
    ///   keytime log                 All sessions
    ///   keytime log --day today     Sessions started today
    ///   keytime log --limit 10      The ten most recent
    #[command(alias = "l")]
    Log(LogArgs),

    /// Show totals and the daily chart
    ///
    /// # Examples
    ///
    ///   keytime stats
    ///   keytime stats --day yesterday
    ///   keytime stats --day 2024-06-01 -o json
    #[command(alias = "s")]
    Stats(StatsArgs),

    /// Delete one session by its log index
    ///
    /// The index is the `#N` shown by `keytime log`.
    Delete {
        /// Session index
        index: usize,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Delete every recorded session
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export sessions as CSV
    ///
    /// Writes to ~/.keytime/exports/keytime-sessions-YYYY-MM-DD.csv
    /// unless --out is given.
    Export {
        /// Output file
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Import sessions from CSV and append them to the log
    Import {
        /// CSV file to read
        path: PathBuf,

        /// Merge without asking
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Share shortcuts as a link, or apply a shared link
    ///
    /// # Examples
    ///
    ///   keytime share
    ///   keytime share apply "https://keytime.app/?shortcuts=..."
    Share(ShareArgs),

    /// Show or change preferences
    ///
    /// # Examples
    ///
    ///   keytime settings
    ///   keytime settings --show-milliseconds true --theme light
    Settings(SettingsArgs),

    /// Generate shell completions
    ///
    /// Example: keytime completions bash > ~/.bash_completion.d/keytime
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the interactive timer.
#[derive(Args, Default)]
pub struct TuiArgs {
    /// Share link to load shortcuts from before starting
    #[arg(long, value_name = "URL")]
    pub link: Option<String>,
}

/// Arguments for shortcut management.
#[derive(Args)]
pub struct ShortcutArgs {
    #[command(subcommand)]
    pub command: ShortcutCommands,
}

/// Shortcut subcommands.
#[derive(Subcommand)]
pub enum ShortcutCommands {
    /// Add a shortcut, replacing any existing one on the same key
    #[command(alias = "a")]
    Add {
        /// Single character key (not space)
        key: String,

        /// Activity category
        category: String,

        /// Countdown length in minutes, 0 for a stopwatch
        #[arg(long, short = 't', default_value = "0")]
        timer: u32,
    },

    /// List shortcuts
    #[command(alias = "ls")]
    List,

    /// Delete a shortcut
    #[command(alias = "rm")]
    Delete {
        /// Key to delete
        key: String,
    },

    /// Change a shortcut's category or timer
    ///
    /// Unspecified fields keep their current value. Use --new-key to move
    /// the shortcut to another key.
    Edit {
        /// Key to edit
        key: String,

        /// New key
        #[arg(long)]
        new_key: Option<String>,

        /// New category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// New countdown length in minutes
        #[arg(long, short = 't')]
        timer: Option<u32>,
    },
}

/// Arguments for the session log.
#[derive(Args)]
pub struct LogArgs {
    /// Only sessions started on this day (today, yesterday, -N, YYYY-MM-DD)
    #[arg(long, short = 'd', allow_hyphen_values = true)]
    pub day: Option<String>,

    /// Show at most this many entries
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

/// Arguments for statistics.
#[derive(Args)]
pub struct StatsArgs {
    /// Day to report on (today, yesterday, -N, YYYY-MM-DD)
    #[arg(long, short = 'd', default_value = "today", allow_hyphen_values = true)]
    pub day: String,
}

/// Arguments for share links.
#[derive(Args)]
pub struct ShareArgs {
    #[command(subcommand)]
    pub command: Option<ShareCommands>,
}

/// Share subcommands.
#[derive(Subcommand)]
pub enum ShareCommands {
    /// Print a link carrying the current shortcuts (default)
    Url,

    /// Replace the shortcuts with those in a link
    Apply {
        /// A share URL, its query string, or the bare payload
        link: String,
    },
}

/// Arguments for preferences.
#[derive(Args)]
pub struct SettingsArgs {
    /// Show tenths of a second on the timer
    #[arg(long, value_name = "BOOL")]
    pub show_milliseconds: Option<bool>,

    /// Ring the terminal bell when a countdown ends
    #[arg(long, value_name = "BOOL")]
    pub play_sound: Option<bool>,

    /// Color theme
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,
}

impl SettingsArgs {
    /// Whether any setting is being changed.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.show_milliseconds.is_some() || self.play_sound.is_some() || self.theme.is_some()
    }
}
