//! Reading Generator Port - turns a fully revealed draw into a reading.
//!
//! # Contract
//!
//! Implementations must:
//! - Return exactly four pages and a share card
//! - List the draw's selected cards in selection order
//! - Not touch the session; recording the reading is the caller's job
//!
//! Generation may fail. Callers decide whether to fall back or surface the
//! error.

use async_trait::async_trait;

use crate::domain::draw::DrawSession;
use crate::domain::reading::{GenerationError, ReadingArtifact};

#[async_trait]
pub trait ReadingGenerator: Send + Sync {
    /// Generates a reading for `session`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the upstream call fails or its output
    /// cannot be turned into an artifact.
    async fn generate(&self, session: &DrawSession) -> Result<ReadingArtifact, GenerationError>;

    /// Short name recorded in the artifact metadata.
    fn name(&self) -> String;
}
