use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, parsing, or validating the
/// configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to write the default config file.
    #[error("failed to create default config: {0}")]
    CreateDefault(String),

    #[error("TOML parse error: {0}")]
    Parse(String),

    /// A config value is out of range.
    #[error("validation error: {field}: {message}")]
    Validation {
        /// Dotted field path such as `terminal.cols`.
        field: String,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
