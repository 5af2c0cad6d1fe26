//! Core error types for ignite-core.
//!
//! Cycle transitions are total and never fail; errors only arise at the
//! boundaries (user input validation and configuration files).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ignite-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home or config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Validation errors for new cycle input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name is blank
    #[error("task is required")]
    EmptyTask,

    /// Duration below the allowed minimum
    #[error("a cycle must be at least {min} minutes (got {got})")]
    TooShort { min: u32, got: i64 },

    /// Duration above the allowed maximum
    #[error("a cycle must be at most {max} minutes (got {got})")]
    TooLong { max: u32, got: i64 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyTask => "task",
            ValidationError::TooShort { .. } | ValidationError::TooLong { .. } => "minutes_amount",
            ValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
