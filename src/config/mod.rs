//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `COSMO_DRAW` prefix and
//! `__` between nested keys. Every section has defaults, so an empty
//! environment yields a working template-mode configuration.
//!
//! # Example
//!
//! ```no_run
//! use cosmo_draw::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_tracing(&config.telemetry);
//! ```

mod error;
mod reading;
mod session;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use reading::{ReadingConfig, ReadingMode};
pub use session::SessionConfig;
pub use telemetry::{init_tracing, TelemetryConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Session lifetime and store capacity
    #[serde(default)]
    pub session: SessionConfig,

    /// Reading generator selection and provider settings
    #[serde(default)]
    pub reading: ReadingConfig,

    /// Log output
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COSMO_DRAW` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `COSMO_DRAW__SESSION__TTL_SECS=1800` -> `session.ttl_secs = 1800`
    /// - `COSMO_DRAW__READING__MODE=llm` -> `reading.mode = Llm`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COSMO_DRAW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.session.validate()?;
        self.reading.validate()?;
        Ok(())
    }
}
