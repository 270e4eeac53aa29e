//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers (OpenAI, mock)
//! - `clock` - system and manual clocks
//! - `reading` - reading generators (template, LLM, guarded)
//! - `storage` - in-memory session store

pub mod ai;
pub mod clock;
pub mod reading;
pub mod storage;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use clock::{ManualClock, SystemClock};
pub use reading::{
    FailureMode, GuardedReadingGenerator, LlmReadingGenerator, TemplateReadingGenerator,
};
pub use storage::InMemorySessionStore;
