//! AI Provider Port - one prompt in, one reply out.
//!
//! A reading costs exactly one completion: a fixed system instruction, the
//! draw prompt, and optionally a demand for a bare JSON object back. There is
//! no conversation history and no streaming.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::DrawId;

/// Port for LLM completion calls.
#[async_trait]
pub trait AIProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Provider and model names, used to label generated readings.
    fn provider_info(&self) -> ProviderInfo;
}

/// A single prompt issued on behalf of one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Draw the reading is for; carried into provider logs.
    pub draw_id: DrawId,
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Ask the provider for a single JSON object.
    pub json_output: bool,
}

impl CompletionRequest {
    pub fn new(draw_id: DrawId, prompt: impl Into<String>) -> Self {
        Self {
            draw_id,
            system: None,
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
            json_output: false,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Text returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: String,
    /// Model that actually answered; may differ from the one requested.
    pub model: String,
    pub usage: TokenUsage,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt: u32,
    pub completion: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt + self.completion
    }
}

/// Why the model stopped writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Finished,
    /// Cut off at `max_tokens`; the reply is incomplete.
    TokenLimit,
    /// Cut off by the provider's content filter.
    Filtered,
}

impl StopReason {
    pub fn is_complete(self) -> bool {
        self == StopReason::Finished
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Finished => "finished",
            StopReason::TokenLimit => "token limit",
            StopReason::Filtered => "content filter",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Provider failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AIError {
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("request refused by content filter: {0}")]
    ContentFiltered(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl AIError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable(_)
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_plain_text() {
        let id = DrawId::new();
        let request = CompletionRequest::new(id, "Cards: Rider, Clover");

        assert_eq!(request.draw_id, id);
        assert_eq!(request.prompt, "Cards: Rider, Clover");
        assert!(request.system.is_none());
        assert!(!request.json_output);
    }

    #[test]
    fn request_builder_sets_sampling_and_format() {
        let request = CompletionRequest::new(DrawId::new(), "p")
            .with_system("Return JSON")
            .with_max_tokens(1500)
            .with_temperature(0.4)
            .with_json_output();

        assert_eq!(request.system.as_deref(), Some("Return JSON"));
        assert_eq!(request.max_tokens, Some(1500));
        assert_eq!(request.temperature, Some(0.4));
        assert!(request.json_output);
    }

    #[test]
    fn only_finished_replies_are_complete() {
        assert!(StopReason::Finished.is_complete());
        assert!(!StopReason::TokenLimit.is_complete());
        assert_eq!(StopReason::Filtered.to_string(), "content filter");
        assert_eq!(TokenUsage { prompt: 12, completion: 30 }.total(), 42);
    }

    #[test]
    fn transient_errors_are_retryable() {
        assert!(AIError::RateLimited { retry_after_secs: 5 }.is_retryable());
        assert!(AIError::Unavailable("502".into()).is_retryable());
        assert!(AIError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!AIError::AuthenticationFailed.is_retryable());
        assert!(!AIError::ContentFiltered("flagged".into()).is_retryable());
        assert!(!AIError::MalformedResponse("junk".into()).is_retryable());
    }
}
