//! Deck module.
//!
//! - `entries` - the static 36-card table (`list_deck`, `lookup`)
//! - `order` - shuffled permutations of the deck (`DeckOrder`)

mod entries;
mod order;

pub use entries::{list_deck, lookup, DeckEntry, DECK_SIZE};
pub use order::DeckOrder;
