//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Session TTL must be between 1 second and 24 hours")]
    InvalidTtl,

    #[error("Session capacity must be at least 1")]
    InvalidCapacity,

    #[error("Sweep interval must be at least 1 second")]
    InvalidSweepInterval,

    #[error("Reading timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Temperature must be between 0 and 2")]
    InvalidTemperature,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
