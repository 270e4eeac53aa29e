//! Draw phase - the lifecycle of a draw, derived from its state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a draw is in the ritual.
///
/// Never stored. Always derived from the selection, the revealed prefix and
/// whether a reading has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrawPhase {
    Shuffled,
    Picking,
    Revealing,
    Revealed,
    Complete,
}

impl DrawPhase {
    /// Derives the phase from session facts.
    pub fn derive(selected: usize, revealed: usize, spread: usize, has_reading: bool) -> Self {
        if has_reading {
            DrawPhase::Complete
        } else if selected == 0 {
            DrawPhase::Shuffled
        } else if revealed == 0 {
            DrawPhase::Picking
        } else if revealed < spread {
            DrawPhase::Revealing
        } else {
            DrawPhase::Revealed
        }
    }

    /// True while cards can still be picked or put back.
    pub fn allows_selection(&self) -> bool {
        matches!(self, DrawPhase::Shuffled | DrawPhase::Picking)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawPhase::Shuffled => "SHUFFLED",
            DrawPhase::Picking => "PICKING",
            DrawPhase::Revealing => "REVEALING",
            DrawPhase::Revealed => "REVEALED",
            DrawPhase::Complete => "COMPLETE",
        }
    }
}

impl fmt::Display for DrawPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for DrawPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DrawPhase::*;
        match self {
            Shuffled => vec![Picking],
            // Deselecting the last card falls back to Shuffled.
            Picking => vec![Shuffled, Revealing],
            Revealing => vec![Revealed],
            Revealed => vec![Complete],
            Complete => vec![],
        }
    }
}
