//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>ms, <number>s, <number>m, or <number>m<number>s (e.g., 800ms, 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an invalid output mode is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid output mode: \"{input}\". Valid modes are: clipboard, keyboard")]
pub struct InvalidOutputModeError {
    pub input: String,
}

/// Error when recognizer credentials are not configured
#[derive(Debug, Clone, Error)]
#[error("Missing recognizer credentials. Set SAYBLE_APP_ID and SAYBLE_ACCESS_KEY or run 'sayble config set app_id <id>' and 'sayble config set access_key <key>'")]
pub struct MissingCredentials;

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
