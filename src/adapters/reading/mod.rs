//! Reading generation adapters.
//!
//! - `TemplateReadingGenerator` - deterministic, offline
//! - `LlmReadingGenerator` - single JSON completion through an `AIProvider`
//! - `GuardedReadingGenerator` - timeout, validation and fallback around either

mod guarded_generator;
mod llm_generator;
mod template_generator;

pub use guarded_generator::{FailureMode, GuardedReadingGenerator};
pub use llm_generator::LlmReadingGenerator;
pub use template_generator::TemplateReadingGenerator;

use crate::domain::deck;
use crate::domain::draw::DrawSession;
use crate::domain::reading::ReadingCard;

/// Selected cards in selection order, with deck display data.
pub(crate) fn reading_cards(session: &DrawSession) -> Vec<ReadingCard> {
    session
        .selected()
        .iter()
        .map(|card| {
            let entry = deck::lookup(card.card_id.as_str());
            ReadingCard {
                position: card.position,
                card_id: card.card_id.clone(),
                display_name: entry
                    .map(|e| e.display_name.to_string())
                    .unwrap_or_else(|| card.card_id.to_string()),
                symbol: entry.map(|e| e.symbol.to_string()).unwrap_or_default(),
            }
        })
        .collect()
}

pub(crate) fn image_prompt(session: &DrawSession, cards: &[ReadingCard]) -> String {
    let names: Vec<&str> = cards.iter().map(|c| c.display_name.as_str()).collect();
    format!(
        "Abstract symbolic representation of {} in sequence, {} theme, mystical, ethereal",
        names.join(", "),
        session.cosmic().metaphor_phrase()
    )
}
