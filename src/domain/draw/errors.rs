//! Draw-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DrawId, ErrorCode, ValidationError};
use crate::domain::reading::GenerationError;

use super::DrawPhase;

/// Why an action is illegal in the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseConflict {
    #[error("deck can only be shuffled before any card is selected")]
    ShuffleAfterSelection,

    #[error("selection is locked once revealing starts")]
    SelectionLocked,

    #[error("spread of {spread} cards is already full")]
    MaxSpreadReached { spread: usize },

    #[error("all {spread} cards must be selected before revealing ({selected} selected)")]
    SelectionIncomplete { selected: usize, spread: usize },

    #[error("cards must be revealed in order: expected position {expected}, got {requested}")]
    RevealOutOfOrder { expected: usize, requested: usize },

    #[error("every card is already revealed")]
    AllRevealed,

    #[error("all cards must be revealed first ({revealed} of {spread})")]
    NotFullyRevealed { revealed: usize, spread: usize },

    #[error("draw is already complete")]
    AlreadyComplete,

    #[error("reading is not available until the draw is complete")]
    ReadingUnavailable,
}

/// Errors produced by draw operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing and expired draws are indistinguishable.
    #[error("draw not found or expired")]
    NotFoundOrExpired,

    #[error("{conflict} (phase {phase})")]
    PhaseConflict {
        phase: DrawPhase,
        conflict: PhaseConflict,
    },

    /// The draw stays REVEALED and completion can be retried.
    #[error("reading generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("draw {0} already exists")]
    DuplicateId(DrawId),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DrawError {
    pub fn conflict(phase: DrawPhase, conflict: PhaseConflict) -> Self {
        DrawError::PhaseConflict { phase, conflict }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        DrawError::InvariantViolation(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DrawError::Validation(_) => ErrorCode::ValidationFailed,
            DrawError::NotFoundOrExpired => ErrorCode::DrawNotFound,
            DrawError::PhaseConflict { .. } => ErrorCode::PhaseConflict,
            DrawError::Generation(_) => ErrorCode::GenerationFailed,
            DrawError::DuplicateId(_) => ErrorCode::DuplicateDraw,
            DrawError::InvariantViolation(_) => ErrorCode::InternalError,
        }
    }

    /// True if the same request may succeed later without changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DrawError::Generation(_))
    }
}
