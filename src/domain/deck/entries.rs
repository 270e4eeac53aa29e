//! The 36-card Lenormand deck as a static lookup table.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// A card in the deck. Ids are stable; names are display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub symbol: &'static str,
}

const fn entry(id: &'static str, display_name: &'static str, symbol: &'static str) -> DeckEntry {
    DeckEntry {
        id,
        display_name,
        symbol,
    }
}

/// Number of cards in the deck.
pub const DECK_SIZE: usize = 36;

static LENORMAND_DECK: [DeckEntry; DECK_SIZE] = [
    entry("L01", "Rider", "🚴"),
    entry("L02", "Clover", "🍀"),
    entry("L03", "Ship", "🚢"),
    entry("L04", "House", "🏠"),
    entry("L05", "Tree", "🌳"),
    entry("L06", "Clouds", "☁️"),
    entry("L07", "Snake", "🐍"),
    entry("L08", "Coffin", "⚰️"),
    entry("L09", "Bouquet", "💐"),
    entry("L10", "Scythe", "⚡"),
    entry("L11", "Whip", "🔨"),
    entry("L12", "Birds", "🐦"),
    entry("L13", "Child", "👶"),
    entry("L14", "Fox", "🦊"),
    entry("L15", "Bear", "🐻"),
    entry("L16", "Stars", "⭐"),
    entry("L17", "Stork", "🪿"),
    entry("L18", "Dog", "🐕"),
    entry("L19", "Tower", "🗼"),
    entry("L20", "Garden", "🌷"),
    entry("L21", "Mountain", "⛰️"),
    entry("L22", "Crossroads", "🛤️"),
    entry("L23", "Mice", "🐭"),
    entry("L24", "Heart", "❤️"),
    entry("L25", "Ring", "💍"),
    entry("L26", "Book", "📖"),
    entry("L27", "Letter", "✉️"),
    entry("L28", "Man", "👨"),
    entry("L29", "Woman", "👩"),
    entry("L30", "Lily", "🌸"),
    entry("L31", "Sun", "☀️"),
    entry("L32", "Moon", "🌙"),
    entry("L33", "Key", "🗝️"),
    entry("L34", "Fish", "🐟"),
    entry("L35", "Anchor", "⚓"),
    entry("L36", "Cross", "✝️"),
];

static DECK_INDEX: Lazy<HashMap<&'static str, &'static DeckEntry>> =
    Lazy::new(|| LENORMAND_DECK.iter().map(|e| (e.id, e)).collect());

/// Returns the full deck in canonical order.
pub fn list_deck() -> &'static [DeckEntry] {
    &LENORMAND_DECK
}

/// Looks up a card by id.
pub fn lookup(id: &str) -> Option<&'static DeckEntry> {
    DECK_INDEX.get(id).copied()
}
