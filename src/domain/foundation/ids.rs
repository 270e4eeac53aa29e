//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique, unguessable identifier for a draw session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawId(Uuid);

impl DrawId {
    /// Creates a new random DrawId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a DrawId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DrawId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DrawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DrawId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Identifier of a card in the deck (e.g. `"L07"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Creates a new CardId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("card_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wraps a deck table id. Only used for ids known to be valid.
    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_id_generates_unique_values() {
        let id1 = DrawId::new();
        let id2 = DrawId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn draw_id_parses_from_valid_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: DrawId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn draw_id_parse_tolerates_surrounding_whitespace() {
        let id: DrawId = "  550e8400-e29b-41d4-a716-446655440000 ".parse().unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn draw_id_rejects_garbage() {
        assert!("not-a-draw".parse::<DrawId>().is_err());
    }

    #[test]
    fn draw_id_serializes_to_json() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: DrawId = uuid_str.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid_str));
    }

    #[test]
    fn card_id_trims_input() {
        let id = CardId::new(" L01 ").unwrap();
        assert_eq!(id.as_str(), "L01");
    }

    #[test]
    fn card_id_rejects_empty_string() {
        match CardId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "card_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }
}
