//! GetReadingHandler - returns the stored reading of a completed draw.

use std::sync::Arc;

use crate::domain::draw::{DrawError, PhaseConflict};
use crate::domain::foundation::DrawId;
use crate::domain::reading::ReadingArtifact;
use crate::ports::SessionStore;

use super::log_rejection;

#[derive(Debug, Clone)]
pub struct GetReadingQuery {
    pub draw_id: DrawId,
}

pub struct GetReadingHandler {
    store: Arc<dyn SessionStore>,
}

impl GetReadingHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetReadingQuery) -> Result<ReadingArtifact, DrawError> {
        let result = self.store.get(query.draw_id).await.and_then(|session| {
            session.reading().cloned().ok_or_else(|| {
                DrawError::conflict(session.phase(), PhaseConflict::ReadingUnavailable)
            })
        });

        result.map_err(|e| {
            log_rejection("get_reading", query.draw_id, &e);
            e
        })
    }
}
