//! Draw command and query handlers.
//!
//! Every mutation is one `SessionStore::update` call: validation and the
//! state change happen together under the per-draw lock, so handlers never
//! pre-check phases themselves.

mod complete_draw;
mod get_draw;
mod get_reading;
mod reveal_card;
mod shuffle_deck;
mod start_draw;
mod toggle_card;

pub use complete_draw::{CompleteDrawCommand, CompleteDrawHandler, CompleteDrawResult};
pub use get_draw::{DrawView, GetDrawHandler, GetDrawQuery};
pub use get_reading::{GetReadingHandler, GetReadingQuery};
pub use reveal_card::{RevealCardCommand, RevealCardHandler, RevealCardResult};
pub use shuffle_deck::{ShuffleDeckCommand, ShuffleDeckHandler, ShuffleDeckResult};
pub use start_draw::{StartDrawCommand, StartDrawHandler, StartDrawResult};
pub use toggle_card::{CardChoice, ToggleCardCommand, ToggleCardHandler, ToggleCardResult};

use crate::domain::draw::DrawError;
use crate::domain::foundation::DrawId;

/// Logs a rejected operation. Invariant violations are bugs and go to `error`.
pub(crate) fn log_rejection(operation: &'static str, draw_id: DrawId, err: &DrawError) {
    match err {
        DrawError::InvariantViolation(detail) => tracing::error!(
            operation,
            draw_id = %draw_id,
            code = %err.code(),
            detail = %detail,
            "Draw invariant violated"
        ),
        _ => tracing::debug!(
            operation,
            draw_id = %draw_id,
            code = %err.code(),
            error = %err,
            "Draw operation rejected"
        ),
    }
}
