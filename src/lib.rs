//! keytime - a keyboard-driven time tracker for the terminal
//!
//! Single-key shortcuts start countdown or stopwatch sessions for a
//! category. Sessions are kept in a local `SQLite` key/value store and can
//! be summarized, charted, exported to CSV and shared as links.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::KeytimeError;
