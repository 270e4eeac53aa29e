//! ToggleCardHandler - selects or deselects a card.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::draw::{DrawError, DrawPhase, SelectedCard, ToggleOutcome};
use crate::domain::foundation::{CardId, DrawId};
use crate::ports::{mutator, SessionStore};

use super::log_rejection;

/// Which card to toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardChoice {
    /// Deck card id, e.g. `L07`.
    Id(String),
    /// Index into this draw's shuffled deck.
    DeckIndex(usize),
}

#[derive(Debug, Clone)]
pub struct ToggleCardCommand {
    pub draw_id: DrawId,
    pub card: CardChoice,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCardResult {
    pub outcome: ToggleOutcome,
    pub phase: DrawPhase,
    pub selected: Vec<SelectedCard>,
}

pub struct ToggleCardHandler {
    store: Arc<dyn SessionStore>,
}

impl ToggleCardHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: ToggleCardCommand) -> Result<ToggleCardResult, DrawError> {
        let draw_id = cmd.draw_id;
        let result = self.toggle(cmd).await.map_err(|e| {
            log_rejection("toggle", draw_id, &e);
            e
        })?;

        tracing::debug!(
            draw_id = %draw_id,
            outcome = ?result.outcome,
            phase = %result.phase,
            "Card toggled"
        );
        Ok(result)
    }

    async fn toggle(&self, cmd: ToggleCardCommand) -> Result<ToggleCardResult, DrawError> {
        let card_id = match &cmd.card {
            CardChoice::Id(raw) => Some(CardId::new(raw.trim())?),
            CardChoice::DeckIndex(_) => None,
        };

        let mut outcome = None;
        let session = self
            .store
            .update(
                cmd.draw_id,
                mutator(|session| {
                    let toggled = match (&card_id, &cmd.card) {
                        (Some(id), _) => session.toggle_card(id)?,
                        (None, CardChoice::DeckIndex(index)) => {
                            session.toggle_at_deck_index(*index)?
                        }
                        (None, CardChoice::Id(_)) => {
                            return Err(DrawError::invariant("card id was not parsed"))
                        }
                    };
                    outcome = Some(toggled);
                    Ok(())
                }),
            )
            .await?;

        let outcome =
            outcome.ok_or_else(|| DrawError::invariant("toggle committed without an outcome"))?;

        Ok(ToggleCardResult {
            outcome,
            phase: session.phase(),
            selected: session.selected().to_vec(),
        })
    }
}
