//! Domain layer containing the draw ritual's business rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `deck` - The Lenormand deck table and shuffled deck orders
//! - `cosmic` - Date-based cosmic context
//! - `draw` - Draw session aggregate and its phase machine
//! - `reading` - Reading artifact and acceptance policy

pub mod cosmic;
pub mod deck;
pub mod draw;
pub mod foundation;
pub mod reading;
