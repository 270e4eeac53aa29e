//! Reading generation configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Reading generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingConfig {
    /// Which generator produces readings
    #[serde(default)]
    pub mode: ReadingMode,

    /// Surface generator failures instead of falling back to the template
    #[serde(default)]
    pub hard_fail: bool,

    /// Require printable ASCII share text
    #[serde(default = "default_true")]
    pub ascii_share_text: bool,

    /// OpenAI API key (required in `llm` mode)
    #[serde(default)]
    pub openai_api_key: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bound on a single generation, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum provider retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Reading generator selection
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    #[default]
    Template,
    Llm,
}

impl ReadingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an OpenAI key is configured
    pub fn has_api_key(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate reading configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mode == ReadingMode::Llm && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(())
    }
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            mode: ReadingMode::default(),
            hard_fail: false,
            ascii_share_text: true,
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: default_temperature(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_temperature() -> f32 {
    0.7
}
