//! Error types for the weld diff engine.

use thiserror::Error;

/// Main error type for weld operations.
#[derive(Error, Debug)]
pub enum WeldError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Content too large: {size} bytes (max {limit})")]
    ContentTooLarge { size: usize, limit: usize },
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for weld operations.
pub type Result<T> = std::result::Result<T, WeldError>;
