//! Cosmic context - a pure mapping from a calendar date to a daily descriptor.
//!
//! The descriptor and metaphor rotate through twelve patterns keyed on the
//! day of the year, so every caller on the same date sees the same context.

mod zodiac;

pub use zodiac::ZodiacSign;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const DESCRIPTORS: [&str; 12] = [
    "A day of gentle shifts and quiet clarity",
    "A moment of crossing thresholds and new perspectives",
    "A time of alignment between intention and action",
    "A period of shedding old patterns and making space",
    "A gathering of energies and focused direction",
    "An unfolding of possibilities and fresh insights",
    "A merging of paths and collaborative energies",
    "A transformation through reflection and release",
    "A reaching toward clarity and higher understanding",
    "A grounding in stability and practical wisdom",
    "A flowing with natural rhythms and intuitive guidance",
    "An awakening to new awareness and deeper connection",
];

const METAPHORS: [&str; 12] = [
    "tide",
    "crossing",
    "alignment",
    "shedding",
    "gathering",
    "unfolding",
    "merging",
    "transforming",
    "reaching",
    "grounding",
    "flowing",
    "awakening",
];

/// Daily context attached to a draw when it starts. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmicContext {
    pub day_of_year: u32,
    pub descriptor: String,
    pub metaphor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zodiac: Option<ZodiacSign>,
}

impl CosmicContext {
    /// Metaphor phrased for prose, e.g. "the tide".
    pub fn metaphor_phrase(&self) -> String {
        format!("the {}", self.metaphor)
    }
}

/// Computes the context for `date`. The zodiac is carried through untouched.
pub fn compute(date: NaiveDate, zodiac: Option<ZodiacSign>) -> CosmicContext {
    let day_of_year = date.ordinal();
    let idx = (day_of_year as usize) % DESCRIPTORS.len();

    CosmicContext {
        day_of_year,
        descriptor: DESCRIPTORS[idx].to_string(),
        metaphor: METAPHORS[idx].to_string(),
        zodiac,
    }
}
