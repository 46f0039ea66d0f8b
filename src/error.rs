use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Validation error: {0}")]
    #[diagnostic(code(focusdeck::validation))]
    Validation(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(focusdeck::not_found))]
    NotFound(String),

    #[error("Invalid recurrence rule: {0}")]
    #[diagnostic(code(focusdeck::invalid_recurrence))]
    InvalidRecurrence(String),

    #[error("Storage error: {0}")]
    #[diagnostic(code(focusdeck::storage))]
    Storage(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(focusdeck::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(focusdeck::config))]
    Config(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(focusdeck::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(focusdeck::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(focusdeck::serialization))]
    Serialization(String),
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
#[allow(dead_code)]
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create not-found errors
pub fn not_found_error(message: &str) -> Error {
    Error::NotFound(message.to_string())
}

/// Helper to create recurrence errors
pub fn recurrence_error(message: &str) -> Error {
    Error::InvalidRecurrence(message.to_string())
}

/// Helper to create storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}

/// Helper to create component errors
#[allow(dead_code)]
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}
