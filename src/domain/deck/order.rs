//! Deck order: a permutation of every card id, produced by an unbiased shuffle.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::CardId;

use super::entries::{list_deck, DECK_SIZE};

/// Permutation of all deck ids, in the order the user sees them face down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckOrder(Vec<CardId>);

impl DeckOrder {
    /// The unshuffled canonical order.
    pub fn canonical() -> Self {
        Self(list_deck().iter().map(|e| CardId::from_static(e.id)).collect())
    }

    /// Fisher-Yates shuffle of the canonical order using the given source.
    pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut order = Self::canonical();
        order.0.shuffle(rng);
        order
    }

    /// Shuffle using the thread-local CSPRNG.
    pub fn shuffled() -> Self {
        Self::shuffled_with(&mut rand::thread_rng())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CardId> {
        self.0.get(index)
    }

    pub fn contains(&self, card_id: &CardId) -> bool {
        self.0.contains(card_id)
    }

    pub fn position_of(&self, card_id: &CardId) -> Option<usize> {
        self.0.iter().position(|c| c == card_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.0.iter()
    }

    /// True if this is a permutation of the full deck.
    pub fn is_complete_permutation(&self) -> bool {
        if self.0.len() != DECK_SIZE {
            return false;
        }
        let mut sorted = self.0.clone();
        sorted.sort();
        sorted == Self::canonical().0
    }
}
