//! Guarded reading generator.
//!
//! Wraps an optional primary generator with a timeout and the artifact
//! policy. Anything the primary gets wrong (error, timeout, malformed
//! artifact) is either replaced by the template reading or returned to the
//! caller, depending on the failure mode.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::draw::DrawSession;
use crate::domain::reading::{ArtifactPolicy, GenerationError, ReadingArtifact};
use crate::ports::ReadingGenerator;

use super::TemplateReadingGenerator;

/// What to do when the primary generator fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Substitute the template reading.
    #[default]
    Fallback,
    /// Return the error; the draw stays REVEALED and completion can be retried.
    HardFail,
}

/// The reading generator handlers talk to.
pub struct GuardedReadingGenerator {
    primary: Option<Arc<dyn ReadingGenerator>>,
    template: TemplateReadingGenerator,
    policy: ArtifactPolicy,
    timeout: Duration,
    mode: FailureMode,
}

impl GuardedReadingGenerator {
    /// Template-only generator with the default policy.
    pub fn new(template: TemplateReadingGenerator, timeout: Duration) -> Self {
        Self {
            primary: None,
            template,
            policy: ArtifactPolicy::default(),
            timeout,
            mode: FailureMode::default(),
        }
    }

    pub fn with_primary(mut self, primary: Arc<dyn ReadingGenerator>) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn with_policy(mut self, policy: ArtifactPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mode(mut self, mode: FailureMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> FailureMode {
        self.mode
    }

    async fn run_primary(
        &self,
        primary: &dyn ReadingGenerator,
        session: &DrawSession,
    ) -> Result<ReadingArtifact, GenerationError> {
        let artifact = tokio::time::timeout(self.timeout, primary.generate(session))
            .await
            .map_err(|_| GenerationError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })??;

        self.policy.validate(&artifact, &session.selected_ids())?;

        let off_target = artifact.caps.pages_off_target(&artifact.pages);
        if !off_target.is_empty() {
            tracing::debug!(
                draw_id = %session.id(),
                generator = %primary.name(),
                pages = ?off_target,
                "Reading pages outside word targets"
            );
        }
        Ok(artifact)
    }

    async fn run_template(&self, session: &DrawSession) -> Result<ReadingArtifact, GenerationError> {
        let artifact = self.template.generate(session).await?;
        self.policy.validate(&artifact, &session.selected_ids())?;
        Ok(artifact)
    }
}

#[async_trait]
impl ReadingGenerator for GuardedReadingGenerator {
    async fn generate(&self, session: &DrawSession) -> Result<ReadingArtifact, GenerationError> {
        let Some(primary) = &self.primary else {
            return self.run_template(session).await;
        };

        match self.run_primary(primary.as_ref(), session).await {
            Ok(artifact) => Ok(artifact),
            Err(e) if self.mode == FailureMode::HardFail => {
                tracing::warn!(
                    draw_id = %session.id(),
                    generator = %primary.name(),
                    error = %e,
                    "Reading generation failed"
                );
                Err(e)
            }
            Err(e) => {
                tracing::warn!(
                    draw_id = %session.id(),
                    generator = %primary.name(),
                    error = %e,
                    "Reading generation failed, falling back to template"
                );
                self.run_template(session).await
            }
        }
    }

    fn name(&self) -> String {
        match &self.primary {
            Some(primary) => primary.name(),
            None => self.template.name(),
        }
    }
}
