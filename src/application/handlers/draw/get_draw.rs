//! GetDrawHandler - public view of a draw.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::cosmic::CosmicContext;
use crate::domain::draw::{DrawError, DrawPhase, DrawSession, SelectedCard, SpreadSize};
use crate::domain::foundation::{DrawId, Timestamp};
use crate::ports::SessionStore;

use super::log_rejection;

#[derive(Debug, Clone)]
pub struct GetDrawQuery {
    pub draw_id: DrawId,
}

/// Draw state as shown to its owner. The deck order is never exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawView {
    pub draw_id: DrawId,
    pub phase: DrawPhase,
    pub spread: SpreadSize,
    pub name: String,
    pub question: String,
    pub cosmic: CosmicContext,
    pub selected: Vec<SelectedCard>,
    pub revealed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_reveal_position: Option<usize>,
    pub reading_available: bool,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl From<&DrawSession> for DrawView {
    fn from(session: &DrawSession) -> Self {
        Self {
            draw_id: session.id(),
            phase: session.phase(),
            spread: session.input().spread(),
            name: session.input().name().to_string(),
            question: session.input().question().to_string(),
            cosmic: session.cosmic().clone(),
            selected: session.selected().to_vec(),
            revealed_count: session.revealed_count(),
            next_reveal_position: session.next_reveal_position(),
            reading_available: session.reading().is_some(),
            created_at: session.created_at(),
            expires_at: session.expires_at(),
            completed_at: session.completed_at(),
        }
    }
}

pub struct GetDrawHandler {
    store: Arc<dyn SessionStore>,
}

impl GetDrawHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetDrawQuery) -> Result<DrawView, DrawError> {
        let session = self.store.get(query.draw_id).await.map_err(|e| {
            log_rejection("get", query.draw_id, &e);
            e
        })?;
        Ok(DrawView::from(&session))
    }
}
