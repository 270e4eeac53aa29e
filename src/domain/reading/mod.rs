//! Reading module - the narrative artifact and its acceptance rules.

mod artifact;
mod policy;

pub use artifact::{
    ReadingArtifact, ReadingCaps, ReadingCard, ReadingMeta, ReadingPages, ShareCard, WordRange,
    DISCLAIMER, PAGE_TITLES, SHARE_TITLE,
};
pub use policy::{is_safe_ascii, ArtifactPolicy};

use thiserror::Error;

use crate::ports::AIError;

/// Failure to produce an acceptable reading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("provider error: {0}")]
    Provider(#[from] AIError),

    #[error("generation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("unparseable output: {0}")]
    Parse(String),
}
