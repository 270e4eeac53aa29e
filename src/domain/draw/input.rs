//! Draw input: who is asking, what, and how many cards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::cosmic::ZodiacSign;
use crate::domain::foundation::ValidationError;

const MAX_NAME_LEN: usize = 100;
const MAX_QUESTION_LEN: usize = 1000;

/// Number of cards in a spread. Only three- and five-card spreads exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SpreadSize {
    Three,
    Five,
}

impl SpreadSize {
    pub fn count(&self) -> usize {
        match self {
            SpreadSize::Three => 3,
            SpreadSize::Five => 5,
        }
    }
}

impl TryFrom<u8> for SpreadSize {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(SpreadSize::Three),
            5 => Ok(SpreadSize::Five),
            other => Err(ValidationError::invalid_format(
                "spread",
                format!("spread must be 3 or 5, got {}", other),
            )),
        }
    }
}

impl From<SpreadSize> for u8 {
    fn from(value: SpreadSize) -> Self {
        value.count() as u8
    }
}

impl fmt::Display for SpreadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// Immutable input captured when a draw starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawInput {
    name: String,
    question: String,
    spread: SpreadSize,
    zodiac: Option<ZodiacSign>,
    birthdate: Option<NaiveDate>,
}

impl DrawInput {
    /// Validates name and question. Both are trimmed and must be non-empty.
    pub fn new(
        name: impl Into<String>,
        question: impl Into<String>,
        spread: SpreadSize,
    ) -> Result<Self, ValidationError> {
        let name = required_text("name", name.into(), MAX_NAME_LEN)?;
        let question = required_text("question", question.into(), MAX_QUESTION_LEN)?;

        Ok(Self {
            name,
            question,
            spread,
            zodiac: None,
            birthdate: None,
        })
    }

    pub fn with_zodiac(mut self, zodiac: ZodiacSign) -> Self {
        self.zodiac = Some(zodiac);
        self
    }

    pub fn with_birthdate(mut self, birthdate: NaiveDate) -> Self {
        self.birthdate = Some(birthdate);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn spread(&self) -> SpreadSize {
        self.spread
    }

    pub fn zodiac(&self) -> Option<ZodiacSign> {
        self.zodiac
    }

    pub fn birthdate(&self) -> Option<NaiveDate> {
        self.birthdate
    }

    /// Explicit zodiac wins; otherwise it is derived from the birthdate.
    pub fn effective_zodiac(&self) -> Option<ZodiacSign> {
        self.zodiac
            .or_else(|| self.birthdate.map(ZodiacSign::from_date))
    }
}

/// Parses an ISO `YYYY-MM-DD` birthdate.
pub fn parse_birthdate(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format("birthdate", "expected YYYY-MM-DD"))
}

fn required_text(field: &str, value: String, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(ValidationError::out_of_range(field, 1, max as i64, len as i64));
    }
    Ok(trimmed.to_string())
}
