//! Template-based reading generator.
//!
//! Builds the four pages from fixed sentence templates, the card names and
//! the cosmic metaphor. Needs no external call and never fails, which makes
//! it the fallback whenever the LLM path is unavailable.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::draw::DrawSession;
use crate::domain::reading::{
    GenerationError, ReadingArtifact, ReadingCaps, ReadingCard, ReadingMeta, ReadingPages,
    ShareCard,
};
use crate::ports::{Clock, ReadingGenerator};

use super::{image_prompt, reading_cards};

/// Deterministic offline generator.
#[derive(Clone)]
pub struct TemplateReadingGenerator {
    clock: Arc<dyn Clock>,
}

impl TemplateReadingGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Builds the pages and share text for an ordered card list.
    pub fn compose(session: &DrawSession, cards: &[ReadingCard]) -> (ReadingPages, String) {
        let names: Vec<&str> = cards.iter().map(|c| c.display_name.as_str()).collect();
        let card_list = names.join(", ");
        let metaphor = session.cosmic().metaphor_phrase();
        let first = names.first().copied().unwrap_or_default();
        let last = names.last().copied().unwrap_or_default();

        let frame = format!(
            "The sequence of {} suggests a journey shaped by {}. The opening card sets a tone \
             of inquiry, while the final position points toward resolution. Together, these \
             cards form a narrative arc that reflects on {}.",
            card_list,
            metaphor,
            session.input().question().to_lowercase()
        );

        let mut unfolding = match names.get(1) {
            Some(second) => format!(
                "The first card, {}, establishes the foundation of this reading. As it connects \
                 with {}, a dynamic emerges that suggests movement and change.",
                first, second
            ),
            None => format!(
                "The first card, {}, establishes the foundation of this reading.",
                first
            ),
        };
        if names.len() == 5 {
            unfolding.push_str(&format!(
                " The middle cards, {}, act as pivots, revealing how these energies interact \
                 and add layers of complexity.",
                names[2..4].join(" and ")
            ));
        } else if names.len() == 3 {
            unfolding.push_str(
                " The middle position acts as a pivot, revealing how these energies interact.",
            );
        }
        unfolding.push_str(&format!(
            " The final card, {}, indicates the direction toward which this sequence points. \
             The relational meaning emerges not from individual cards, but from how they flow \
             together.",
            last
        ));

        let implications = "This sequence suggests that there are forces at play that may be \
             forming or reinforcing certain patterns. The interaction between the cards \
             indicates both potential harmony and areas where tension might arise. The reading \
             points to underlying dynamics that shape the situation, rather than fixed outcomes. \
             Consider how these energies might be influencing your current path."
            .to_string();

        let direction = format!(
            "The sequence indicates a path forward that acknowledges both the opening energy and \
             the resolution suggested by the final card. This reading points to reflection and \
             awareness rather than prediction. The {} theme suggests a natural flow that you can \
             align with through conscious choice.",
            metaphor
        );

        let share = format!(
            "The sequence of {} suggests a journey shaped by {}. This reading points to \
             reflection and awareness, indicating a path forward that acknowledges both opening \
             energies and potential resolution.",
            card_list, metaphor
        );

        (
            ReadingPages::new([frame, unfolding, implications, direction]),
            share,
        )
    }
}

#[async_trait]
impl ReadingGenerator for TemplateReadingGenerator {
    async fn generate(&self, session: &DrawSession) -> Result<ReadingArtifact, GenerationError> {
        let cards = reading_cards(session);
        let (pages, share_text) = Self::compose(session, &cards);

        Ok(ReadingArtifact {
            meta: ReadingMeta::new(session.id(), self.clock.now(), self.name()),
            image_prompt: Some(image_prompt(session, &cards)),
            cards,
            cosmic: session.cosmic().clone(),
            pages,
            caps: ReadingCaps::STANDARD,
            share: ShareCard::new(share_text),
        })
    }

    fn name(&self) -> String {
        "template".to_string()
    }
}
