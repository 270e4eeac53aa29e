//! ShuffleDeckHandler - reshuffles the deck before any card is picked.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::deck::DeckOrder;
use crate::domain::draw::{DrawError, DrawPhase};
use crate::domain::foundation::DrawId;
use crate::ports::{mutator, SessionStore};

use super::log_rejection;

#[derive(Debug, Clone)]
pub struct ShuffleDeckCommand {
    pub draw_id: DrawId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleDeckResult {
    pub phase: DrawPhase,
}

pub struct ShuffleDeckHandler {
    store: Arc<dyn SessionStore>,
}

impl ShuffleDeckHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: ShuffleDeckCommand) -> Result<ShuffleDeckResult, DrawError> {
        let order = DeckOrder::shuffled();

        let session = self
            .store
            .update(cmd.draw_id, mutator(move |session| session.shuffle(order)))
            .await
            .map_err(|e| {
                log_rejection("shuffle", cmd.draw_id, &e);
                e
            })?;

        tracing::debug!(draw_id = %cmd.draw_id, "Deck shuffled");

        Ok(ShuffleDeckResult {
            phase: session.phase(),
        })
    }
}
