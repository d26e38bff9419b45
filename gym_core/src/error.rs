//! Error types for the gym_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gym_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing profile/machine data at plan-generation time
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced machine id is not in the catalog
    #[error("Unknown machine: {0}")]
    UnknownMachine(String),

    /// Session operation attempted in a state that forbids it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),
}
