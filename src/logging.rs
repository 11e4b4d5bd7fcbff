//! Log setup.
//!
//! Logs go to daily rolling files under `~/.keytime/logs/`. Nothing is
//! written to stdout, which belongs to command output and the TUI.

use tracing_appender::rolling::{Builder, Rotation};

use crate::config::{LoggingConfig, Paths};
use crate::error::KeytimeError;

/// File name prefix for log files.
pub const LOG_PREFIX: &str = "keytime";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the appender
/// cannot be built.
pub fn enable_logging(paths: &Paths, config: &LoggingConfig) -> Result<(), KeytimeError> {
    paths.ensure_dirs()?;

    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(config.max_files.max(1))
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(&paths.logs)
        .map_err(|e| KeytimeError::Config(format!("Failed to create log appender: {e}")))?;

    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    let directive = if level.contains('=') {
        level.clone()
    } else {
        format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
    };
    let filter = tracing_subscriber::EnvFilter::try_new(directive)
        .map_err(|e| KeytimeError::Config(format!("Invalid log level {level}: {e}")))?;

    // A subscriber may already be installed (e.g. by tests); that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(appender)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_logging_creates_log_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());

        enable_logging(&paths, &LoggingConfig::default()).unwrap();
        assert!(paths.logs.exists());
    }
}
