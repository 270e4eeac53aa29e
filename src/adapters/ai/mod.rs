//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Scripted reading replies for tests
//! - `OpenAIProvider` - OpenAI-compatible chat completions

mod mock_provider;
mod openai_provider;

pub use mock_provider::{reading_reply, MockAIProvider, ScriptedReply};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
