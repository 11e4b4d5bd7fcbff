//! Error types for keytime.

use thiserror::Error;

/// Errors that can occur in keytime.
#[derive(Error, Debug)]
pub enum KeytimeError {
    /// Local database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration or environment error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or terminal I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse user-supplied or stored data.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A shortcut definition was rejected.
    #[error("Invalid shortcut: {0}")]
    InvalidShortcut(String),

    /// The terminal front-end failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl KeytimeError {
    /// Exit code used by the binary for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::InvalidShortcut(_) | Self::Parse(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeytimeError::InvalidShortcut("space is reserved".to_string());
        assert_eq!(err.to_string(), "Invalid shortcut: space is reserved");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: KeytimeError = io.into();
        assert!(matches!(err, KeytimeError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_user_errors_exit_code() {
        assert_eq!(KeytimeError::NotFound("x".into()).exit_code(), 2);
        assert_eq!(KeytimeError::Parse("x".into()).exit_code(), 2);
    }
}
