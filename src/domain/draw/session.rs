//! DrawSession aggregate - the root entity of a single card-drawing ritual.
//!
//! Every mutation validates against the derived phase first and leaves the
//! session untouched when it rejects. The phase itself is never stored; it
//! is recomputed from the selection, the revealed prefix and the reading.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::domain::cosmic::{self, CosmicContext};
use crate::domain::deck::DeckOrder;
use crate::domain::foundation::{CardId, DrawId, StateMachine, Timestamp, ValidationError};
use crate::domain::reading::ReadingArtifact;

use super::{DrawError, DrawInput, DrawPhase, PhaseConflict};

/// A card the user has picked, at a dense position in the spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCard {
    pub position: usize,
    pub card_id: CardId,
    pub revealed: bool,
}

/// Result of toggling a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ToggleOutcome {
    /// Card appended at `position`.
    #[serde(rename_all = "camelCase")]
    Selected { position: usize },
    /// Card removed; later cards shifted down by one.
    #[serde(rename_all = "camelCase")]
    Deselected { previous_position: usize },
}

/// Whether completion still has to generate a reading.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionStatus {
    /// Already complete; holds the stored artifact.
    AlreadyComplete(Box<ReadingArtifact>),
    /// Fully revealed, no reading yet.
    Ready,
}

/// The draw session aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawSession {
    id: DrawId,
    input: DrawInput,
    deck_order: DeckOrder,
    selected: Vec<SelectedCard>,
    cosmic: CosmicContext,
    reading: Option<ReadingArtifact>,
    created_at: Timestamp,
    expires_at: Timestamp,
    completed_at: Option<Timestamp>,
}

impl DrawSession {
    /// Starts a new draw. The cosmic context is computed for the start date.
    pub fn start(
        id: DrawId,
        input: DrawInput,
        deck_order: DeckOrder,
        now: Timestamp,
        ttl: Duration,
    ) -> Self {
        let cosmic = cosmic::compute(now.date(), input.effective_zodiac());

        Self {
            id,
            input,
            deck_order,
            selected: Vec::new(),
            cosmic,
            reading: None,
            created_at: now,
            expires_at: now.plus(ttl),
            completed_at: None,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> DrawId {
        self.id
    }

    pub fn input(&self) -> &DrawInput {
        &self.input
    }

    /// Number of cards in the spread.
    pub fn spread(&self) -> usize {
        self.input.spread().count()
    }

    pub fn deck_order(&self) -> &DeckOrder {
        &self.deck_order
    }

    pub fn selected(&self) -> &[SelectedCard] {
        &self.selected
    }

    pub fn selected_ids(&self) -> Vec<CardId> {
        self.selected.iter().map(|c| c.card_id.clone()).collect()
    }

    pub fn cosmic(&self) -> &CosmicContext {
        &self.cosmic
    }

    pub fn reading(&self) -> Option<&ReadingArtifact> {
        self.reading.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// Length of the revealed prefix.
    pub fn revealed_count(&self) -> usize {
        self.selected.iter().take_while(|c| c.revealed).count()
    }

    /// Derived phase.
    pub fn phase(&self) -> DrawPhase {
        DrawPhase::derive(
            self.selected.len(),
            self.revealed_count(),
            self.spread(),
            self.reading.is_some(),
        )
    }

    /// True once `now` has reached the expiry instant.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    // ───────────────────────────────────────────────────────────────
    // Shuffle & Selection
    // ───────────────────────────────────────────────────────────────

    /// Replaces the deck order. Only legal before the first pick.
    pub fn shuffle(&mut self, order: DeckOrder) -> Result<(), DrawError> {
        let phase = self.phase();
        if phase != DrawPhase::Shuffled {
            return Err(DrawError::conflict(phase, PhaseConflict::ShuffleAfterSelection));
        }
        if !order.is_complete_permutation() {
            return Err(ValidationError::invalid_format(
                "deck_order",
                "not a permutation of the deck",
            )
            .into());
        }

        self.deck_order = order;
        Ok(())
    }

    /// Selects the card, or deselects it if already picked.
    ///
    /// Deselecting renumbers the remaining cards so positions stay dense.
    pub fn toggle_card(&mut self, card_id: &CardId) -> Result<ToggleOutcome, DrawError> {
        let before = self.phase();
        if !before.allows_selection() {
            return Err(DrawError::conflict(before, PhaseConflict::SelectionLocked));
        }
        if !self.deck_order.contains(card_id) {
            return Err(ValidationError::invalid_format(
                "card_id",
                format!("'{}' is not in this deck", card_id),
            )
            .into());
        }

        let outcome = match self.selected.iter().position(|c| &c.card_id == card_id) {
            Some(idx) => {
                self.selected.remove(idx);
                for (pos, card) in self.selected.iter_mut().enumerate() {
                    card.position = pos;
                }
                ToggleOutcome::Deselected {
                    previous_position: idx,
                }
            }
            None => {
                let spread = self.spread();
                if self.selected.len() >= spread {
                    return Err(DrawError::conflict(
                        before,
                        PhaseConflict::MaxSpreadReached { spread },
                    ));
                }
                let position = self.selected.len();
                self.selected.push(SelectedCard {
                    position,
                    card_id: card_id.clone(),
                    revealed: false,
                });
                ToggleOutcome::Selected { position }
            }
        };

        self.ensure_legal_transition(before)?;
        Ok(outcome)
    }

    /// Toggles the card lying at `index` in the shuffled deck.
    pub fn toggle_at_deck_index(&mut self, index: usize) -> Result<ToggleOutcome, DrawError> {
        let card_id = self.deck_order.get(index).cloned().ok_or_else(|| {
            ValidationError::out_of_range(
                "deck_index",
                0,
                self.deck_order.len() as i64 - 1,
                index as i64,
            )
        })?;
        self.toggle_card(&card_id)
    }

    // ───────────────────────────────────────────────────────────────
    // Reveal
    // ───────────────────────────────────────────────────────────────

    /// Position the next reveal must target, if any remain.
    pub fn next_reveal_position(&self) -> Option<usize> {
        let revealed = self.revealed_count();
        (self.selected.len() == self.spread() && revealed < self.spread()).then_some(revealed)
    }

    /// Validates that `position` may be revealed now.
    ///
    /// Checks, in order:
    /// 1. Draw is not complete
    /// 2. Position is inside the spread
    /// 3. Selection is full
    /// 4. Some card is still face down
    /// 5. Position is the next face-down card
    pub fn validate_can_reveal(&self, position: usize) -> Result<(), DrawError> {
        let phase = self.phase();
        let spread = self.spread();

        if phase == DrawPhase::Complete {
            return Err(DrawError::conflict(phase, PhaseConflict::AlreadyComplete));
        }
        if position >= spread {
            return Err(ValidationError::out_of_range(
                "position",
                0,
                spread as i64 - 1,
                position as i64,
            )
            .into());
        }
        if self.selected.len() < spread {
            return Err(DrawError::conflict(
                phase,
                PhaseConflict::SelectionIncomplete {
                    selected: self.selected.len(),
                    spread,
                },
            ));
        }

        let expected = self.revealed_count();
        if expected == spread {
            return Err(DrawError::conflict(phase, PhaseConflict::AllRevealed));
        }
        if position != expected {
            return Err(DrawError::conflict(
                phase,
                PhaseConflict::RevealOutOfOrder {
                    expected,
                    requested: position,
                },
            ));
        }

        Ok(())
    }

    /// Turns over the card at `position`.
    pub fn reveal(&mut self, position: usize) -> Result<(), DrawError> {
        self.validate_can_reveal(position)?;
        let before = self.phase();

        let card = self
            .selected
            .get_mut(position)
            .ok_or_else(|| DrawError::invariant(format!("no card at position {}", position)))?;
        card.revealed = true;

        self.ensure_legal_transition(before)
    }

    // ───────────────────────────────────────────────────────────────
    // Completion
    // ───────────────────────────────────────────────────────────────

    /// Reports whether a reading still needs generating.
    pub fn completion_status(&self) -> Result<CompletionStatus, DrawError> {
        match (&self.reading, self.phase()) {
            (Some(reading), _) => Ok(CompletionStatus::AlreadyComplete(Box::new(reading.clone()))),
            (None, DrawPhase::Revealed) => Ok(CompletionStatus::Ready),
            (None, phase) => Err(DrawError::conflict(
                phase,
                PhaseConflict::NotFullyRevealed {
                    revealed: self.revealed_count(),
                    spread: self.spread(),
                },
            )),
        }
    }

    /// Stores the reading. Set exactly once, from REVEALED.
    pub fn record_reading(
        &mut self,
        reading: ReadingArtifact,
        at: Timestamp,
    ) -> Result<(), DrawError> {
        let before = self.phase();
        match before {
            DrawPhase::Revealed => {}
            DrawPhase::Complete => {
                return Err(DrawError::conflict(before, PhaseConflict::AlreadyComplete))
            }
            _ => {
                return Err(DrawError::conflict(
                    before,
                    PhaseConflict::NotFullyRevealed {
                        revealed: self.revealed_count(),
                        spread: self.spread(),
                    },
                ))
            }
        }
        if reading.meta.draw_id != self.id {
            return Err(DrawError::invariant(format!(
                "reading for draw {} recorded on draw {}",
                reading.meta.draw_id, self.id
            )));
        }

        self.reading = Some(reading);
        self.completed_at = Some(at);
        self.ensure_legal_transition(before)
    }

    // ───────────────────────────────────────────────────────────────
    // Invariants
    // ───────────────────────────────────────────────────────────────

    /// Checks every structural invariant of the session.
    pub fn check_invariants(&self) -> Result<(), DrawError> {
        let spread = self.spread();

        if self.selected.len() > spread {
            return Err(DrawError::invariant(format!(
                "{} cards selected for a spread of {}",
                self.selected.len(),
                spread
            )));
        }

        if !self.deck_order.is_complete_permutation() {
            return Err(DrawError::invariant("deck order is not a full permutation"));
        }

        let mut seen = HashSet::new();
        for (idx, card) in self.selected.iter().enumerate() {
            if card.position != idx {
                return Err(DrawError::invariant(format!(
                    "card at index {} has position {}",
                    idx, card.position
                )));
            }
            if !seen.insert(&card.card_id) {
                return Err(DrawError::invariant(format!(
                    "card {} selected twice",
                    card.card_id
                )));
            }
            if !self.deck_order.contains(&card.card_id) {
                return Err(DrawError::invariant(format!(
                    "card {} not in deck order",
                    card.card_id
                )));
            }
        }

        let revealed_total = self.selected.iter().filter(|c| c.revealed).count();
        if revealed_total != self.revealed_count() {
            return Err(DrawError::invariant("revealed cards do not form a prefix"));
        }
        if revealed_total > 0 && self.selected.len() < spread {
            return Err(DrawError::invariant("cards revealed before selection was full"));
        }

        match (&self.reading, self.completed_at) {
            (Some(_), Some(_)) | (None, None) => {}
            _ => {
                return Err(DrawError::invariant(
                    "reading and completion time must be set together",
                ))
            }
        }
        if self.reading.is_some() && self.revealed_count() != spread {
            return Err(DrawError::invariant("reading recorded before every card was revealed"));
        }

        if !self.created_at.is_before(&self.expires_at) {
            return Err(DrawError::invariant("expiry must follow creation"));
        }

        Ok(())
    }

    /// Rejects a mutation that moved the phase along an illegal edge.
    fn ensure_legal_transition(&self, before: DrawPhase) -> Result<(), DrawError> {
        let after = self.phase();
        if after == before || before.can_transition_to(&after) {
            Ok(())
        } else {
            Err(DrawError::invariant(format!(
                "illegal phase transition {} -> {}",
                before, after
            )))
        }
    }
}
