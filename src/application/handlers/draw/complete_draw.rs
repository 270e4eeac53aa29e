//! CompleteDrawHandler - generates and stores the reading, at most once.
//!
//! Generation runs inside `SessionStore::update_async`, holding the draw's
//! lock. A second caller waits for the first, then finds the draw COMPLETE
//! and gets the stored reading back without invoking the generator again.
//! A failed generation commits nothing; the draw stays REVEALED.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::draw::{CompletionStatus, DrawError, DrawPhase};
use crate::domain::foundation::DrawId;
use crate::domain::reading::ReadingArtifact;
use crate::ports::{async_mutator, Clock, ReadingGenerator, SessionStore};

use super::log_rejection;

#[derive(Debug, Clone)]
pub struct CompleteDrawCommand {
    pub draw_id: DrawId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteDrawResult {
    pub phase: DrawPhase,
    pub reading: ReadingArtifact,
    /// False when the reading already existed.
    pub newly_generated: bool,
}

pub struct CompleteDrawHandler {
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn ReadingGenerator>,
    clock: Arc<dyn Clock>,
}

impl CompleteDrawHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        generator: Arc<dyn ReadingGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
        }
    }

    pub async fn handle(&self, cmd: CompleteDrawCommand) -> Result<CompleteDrawResult, DrawError> {
        let generator = Arc::clone(&self.generator);
        let clock = Arc::clone(&self.clock);
        let generated = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&generated);

        let session = self
            .store
            .update_async(
                cmd.draw_id,
                async_mutator(move |session| {
                    Box::pin(async move {
                        match session.completion_status()? {
                            CompletionStatus::AlreadyComplete(_) => Ok(()),
                            CompletionStatus::Ready => {
                                let artifact = generator.generate(session).await?;
                                session.record_reading(artifact, clock.now())?;
                                flag.store(true, Ordering::SeqCst);
                                Ok(())
                            }
                        }
                    })
                }),
            )
            .await
            .map_err(|e| {
                log_rejection("complete", cmd.draw_id, &e);
                e
            })?;

        let reading = session.reading().cloned().ok_or_else(|| {
            let err = DrawError::invariant("completed draw has no reading");
            log_rejection("complete", cmd.draw_id, &err);
            err
        })?;
        let newly_generated = generated.load(Ordering::SeqCst);

        tracing::debug!(
            draw_id = %cmd.draw_id,
            generator = %reading.meta.generator,
            newly_generated,
            "Draw completed"
        );

        Ok(CompleteDrawResult {
            phase: session.phase(),
            reading,
            newly_generated,
        })
    }
}
