//! Error types for Prism.
//!
//! Errors are split by the stage that raises them: configuration (fatal before
//! a comparison starts), provider calls (contained by the dispatcher and turned
//! into failure results), and history persistence (reported as a warning).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// History log errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Invalid prompt text
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// One or more provider API keys could not be resolved
    #[error("API key not set: {}", .0.join(", "))]
    MissingApiKeys(Vec<String>),
}

/// A failed call to one vision provider.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ProviderError {
    /// Human-readable failure description
    pub message: String,
    /// HTTP status code, when the failure was a non-success response
    pub status_code: Option<u16>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: Some(status),
        }
    }
}

/// History log errors.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Appending a record failed
    #[error("Failed to append to history log {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the log back failed
    #[error("Failed to read history log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another writer panicked while holding the log lock
    #[error("History log lock poisoned for {0}")]
    LockPoisoned(PathBuf),

    /// The background append task died before finishing
    #[error("History write to {0} did not complete")]
    WriteAborted(PathBuf),
}

/// Prompt validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    #[error("Prompt must not be empty")]
    Empty,
}

/// Convenience type alias for Prism results.
pub type Result<T> = std::result::Result<T, PrismError>;
