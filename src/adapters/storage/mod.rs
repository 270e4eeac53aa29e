//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - Process-local map with per-draw locking,
//!   expiry and a capacity bound. Sessions are lost on restart.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemorySessionStore;
//!
//! let store = InMemorySessionStore::new(5000, Arc::new(SystemClock));
//! ```

mod in_memory_session_store;

pub use in_memory_session_store::InMemorySessionStore;
