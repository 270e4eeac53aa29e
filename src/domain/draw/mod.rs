//! Draw module - the draw session state machine.
//!
//! - `input` - validated user input (`DrawInput`, `SpreadSize`)
//! - `phase` - derived lifecycle phase and its legal edges
//! - `session` - the `DrawSession` aggregate
//! - `errors` - `DrawError` and `PhaseConflict`

mod errors;
mod input;
mod phase;
mod session;

pub use errors::{DrawError, PhaseConflict};
pub use input::{parse_birthdate, DrawInput, SpreadSize};
pub use phase::DrawPhase;
pub use session::{CompletionStatus, DrawSession, SelectedCard, ToggleOutcome};
