//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an invalid storage backend is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid storage backend: \"{input}\". Valid backends are: local, remote")]
pub struct InvalidStorageBackend {
    pub input: String,
}

/// Error when a media item violates the per-kind field rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMediaItem {
    #[error("{kind} items cannot carry a duration")]
    UnexpectedDuration { kind: String },

    #[error("voice items require a duration")]
    MissingDuration,

    #[error("{kind} items cannot carry a link preview")]
    UnexpectedPreview { kind: String },

    #[error("media reference must not be empty")]
    EmptyReference,
}

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
