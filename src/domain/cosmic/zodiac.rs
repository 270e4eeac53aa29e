//! Zodiac signs and their (approximate) calendar ranges.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign whose range contains the given month/day.
    pub fn from_date(date: NaiveDate) -> Self {
        // MMDD packed so each sign is one inclusive range.
        match date.month() * 100 + date.day() {
            321..=419 => ZodiacSign::Aries,
            420..=520 => ZodiacSign::Taurus,
            521..=620 => ZodiacSign::Gemini,
            621..=722 => ZodiacSign::Cancer,
            723..=822 => ZodiacSign::Leo,
            823..=922 => ZodiacSign::Virgo,
            923..=1022 => ZodiacSign::Libra,
            1023..=1121 => ZodiacSign::Scorpio,
            1122..=1221 => ZodiacSign::Sagittarius,
            1222..=1231 | 101..=119 => ZodiacSign::Capricorn,
            120..=218 => ZodiacSign::Aquarius,
            _ => ZodiacSign::Pisces,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "aries",
            ZodiacSign::Taurus => "taurus",
            ZodiacSign::Gemini => "gemini",
            ZodiacSign::Cancer => "cancer",
            ZodiacSign::Leo => "leo",
            ZodiacSign::Virgo => "virgo",
            ZodiacSign::Libra => "libra",
            ZodiacSign::Scorpio => "scorpio",
            ZodiacSign::Sagittarius => "sagittarius",
            ZodiacSign::Capricorn => "capricorn",
            ZodiacSign::Aquarius => "aquarius",
            ZodiacSign::Pisces => "pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ZodiacSign {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|z| z.as_str() == wanted)
            .ok_or_else(|| {
                ValidationError::invalid_format("zodiac", format!("unknown sign '{}'", s))
            })
    }
}
