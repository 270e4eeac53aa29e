//! RevealCardHandler - turns over the next card in the spread.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::draw::{DrawError, DrawPhase, SelectedCard};
use crate::domain::foundation::DrawId;
use crate::ports::{mutator, SessionStore};

use super::log_rejection;

#[derive(Debug, Clone)]
pub struct RevealCardCommand {
    pub draw_id: DrawId,
    /// Zero-based spread position; must be the next face-down card.
    pub position: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealCardResult {
    pub phase: DrawPhase,
    pub selected: Vec<SelectedCard>,
    /// The card just turned over.
    pub revealed: SelectedCard,
}

pub struct RevealCardHandler {
    store: Arc<dyn SessionStore>,
}

impl RevealCardHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: RevealCardCommand) -> Result<RevealCardResult, DrawError> {
        let position = cmd.position;
        let session = self
            .store
            .update(cmd.draw_id, mutator(move |session| session.reveal(position)))
            .await
            .map_err(|e| {
                log_rejection("reveal", cmd.draw_id, &e);
                e
            })?;

        let revealed = session.selected().get(position).cloned().ok_or_else(|| {
            let err = DrawError::invariant(format!("revealed position {} is missing", position));
            log_rejection("reveal", cmd.draw_id, &err);
            err
        })?;

        tracing::debug!(
            draw_id = %cmd.draw_id,
            position,
            card_id = %revealed.card_id,
            phase = %session.phase(),
            "Card revealed"
        );

        Ok(RevealCardResult {
            phase: session.phase(),
            selected: session.selected().to_vec(),
            revealed,
        })
    }
}
