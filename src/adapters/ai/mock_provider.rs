//! Scripted AI provider for reading generation tests.
//!
//! Replies are queued up front and replayed one per call. When the script
//! runs dry the provider answers with a well-formed four-page reading, so a
//! test that only counts calls needs no script at all.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .then_fail(AIError::Unavailable("cold start".into()))
//!     .then_reading(["frame", "unfolding", "tension", "direction"], "Plain share");
//! ```

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, StopReason,
    TokenUsage,
};

const IDLE_PAGES: [&str; 4] = [
    "The sequence opens quietly and sets its own pace.",
    "Each card leans on the one before it.",
    "Tension gathers where the cards meet.",
    "Let the final card decide the next step.",
];
const IDLE_SHARE: &str = "The cards point toward a steady next step.";

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Reply text returned as-is.
    Text(String),
    /// Reply text that stopped at the token limit.
    Truncated(String),
    Fail(AIError),
}

/// Provider double that replays [`ScriptedReply`]s and records every request.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    model: String,
    latency: Duration,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Reading reply in the `{pages, shareText}` shape.
pub fn reading_reply(pages: [&str; 4], share_text: &str) -> String {
    json!({ "pages": pages, "shareText": share_text }).to_string()
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            model: "mock-model-1".to_string(),
            latency: Duration::ZERO,
        }
    }

    /// Queues a well-formed reading.
    pub fn then_reading(self, pages: [&str; 4], share_text: &str) -> Self {
        self.then(ScriptedReply::Text(reading_reply(pages, share_text)))
    }

    /// Queues raw reply text, well-formed or not.
    pub fn then_text(self, content: impl Into<String>) -> Self {
        self.then(ScriptedReply::Text(content.into()))
    }

    pub fn then_truncated(self, content: impl Into<String>) -> Self {
        self.then(ScriptedReply::Truncated(content.into()))
    }

    pub fn then_fail(self, error: AIError) -> Self {
        self.then(ScriptedReply::Fail(error))
    }

    pub fn then(self, reply: ScriptedReply) -> Self {
        lock(&self.script).push_back(reply);
        self
    }

    /// Delay before every reply.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }

    fn respond(
        &self,
        request: &CompletionRequest,
        content: String,
        stop: StopReason,
    ) -> CompletionResponse {
        let usage = TokenUsage {
            prompt: word_count(&request.prompt),
            completion: word_count(&content),
        };
        CompletionResponse {
            content,
            model: self.model.clone(),
            usage,
            stop,
        }
    }
}

fn word_count(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        lock(&self.requests).push(request.clone());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let next = lock(&self.script).pop_front();
        match next {
            Some(ScriptedReply::Text(content)) => {
                Ok(self.respond(&request, content, StopReason::Finished))
            }
            Some(ScriptedReply::Truncated(content)) => {
                Ok(self.respond(&request, content, StopReason::TokenLimit))
            }
            Some(ScriptedReply::Fail(error)) => Err(error),
            None => Ok(self.respond(
                &request,
                reading_reply(IDLE_PAGES, IDLE_SHARE),
                StopReason::Finished,
            )),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", &self.model)
    }
}
