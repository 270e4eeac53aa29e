//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - expiring, per-id atomic storage of draw sessions
//! - `ReadingGenerator` - one-shot narrative generation for a revealed draw
//! - `AIProvider` - LLM completion calls used by the LLM reading generator
//! - `Clock` - current time

mod ai_provider;
mod clock;
mod reading_generator;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, StopReason,
    TokenUsage,
};
pub use clock::Clock;
pub use reading_generator::ReadingGenerator;
pub use session_store::{
    async_mutator, mutator, AsyncSessionMutator, SessionMutator, SessionStore, SweepReport,
};
