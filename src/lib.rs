//! Cosmo Draw - card-drawing ritual engine
//!
//! Runs a single Lenormand draw from shuffle to reading: an in-memory,
//! expiring session store, the draw state machine, and reading generation
//! with an LLM path guarded by a deterministic template fallback.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
