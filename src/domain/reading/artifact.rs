//! The reading artifact produced once per completed draw.

use serde::{Deserialize, Serialize};

use crate::domain::cosmic::CosmicContext;
use crate::domain::foundation::{CardId, DrawId, Timestamp};

use super::GenerationError;

pub const DISCLAIMER: &str =
    "For reflection & inspiration only. This reading is not a substitute for professional advice.";

pub const SHARE_TITLE: &str = "Cosmo Tarot";

/// Headings of the four pages, in order.
pub const PAGE_TITLES: [&str; 4] = [
    "Frame & Theme",
    "Sequence Unfolding",
    "Implications & Tension",
    "Interpretation & Direction",
];

/// Generated narrative for a completed draw. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingArtifact {
    pub meta: ReadingMeta,
    /// Selected cards in selection order.
    pub cards: Vec<ReadingCard>,
    pub cosmic: CosmicContext,
    pub pages: ReadingPages,
    pub share: ShareCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    /// Word targets the pages were written against.
    #[serde(default)]
    pub caps: ReadingCaps,
}

impl ReadingArtifact {
    pub fn card_ids(&self) -> impl Iterator<Item = &CardId> {
        self.cards.iter().map(|c| &c.card_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingMeta {
    pub draw_id: DrawId,
    pub generated_at: Timestamp,
    /// Which generator produced the text, e.g. `template` or `llm:gpt-4o-mini`.
    pub generator: String,
    pub locale: String,
    pub disclaimer: String,
}

impl ReadingMeta {
    pub fn new(draw_id: DrawId, generated_at: Timestamp, generator: impl Into<String>) -> Self {
        Self {
            draw_id,
            generated_at,
            generator: generator.into(),
            locale: "en".to_string(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingCard {
    pub position: usize,
    pub card_id: CardId,
    pub display_name: String,
    pub symbol: String,
}

/// Exactly four pages of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ReadingPages([String; 4]);

impl ReadingPages {
    pub fn new(pages: [String; 4]) -> Self {
        Self(pages)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// The closing page, used for share text.
    pub fn last(&self) -> &str {
        &self.0[3]
    }

    pub fn titled(&self) -> impl Iterator<Item = (&'static str, &str)> {
        PAGE_TITLES.iter().copied().zip(self.0.iter().map(String::as_str))
    }
}

impl TryFrom<Vec<String>> for ReadingPages {
    type Error = GenerationError;

    fn try_from(pages: Vec<String>) -> Result<Self, Self::Error> {
        let count = pages.len();
        let pages: [String; 4] = pages.try_into().map_err(|_| {
            GenerationError::InvalidArtifact(format!("expected 4 pages, got {}", count))
        })?;
        Ok(Self(pages))
    }
}

impl From<ReadingPages> for Vec<String> {
    fn from(pages: ReadingPages) -> Self {
        pages.0.into()
    }
}

/// Inclusive word-count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRange {
    pub min: usize,
    pub max: usize,
}

impl WordRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, words: usize) -> bool {
        (self.min..=self.max).contains(&words)
    }
}

impl std::fmt::Display for WordRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Soft per-page word targets. Pages outside them are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingCaps {
    pub page_words_target: [WordRange; 4],
}

impl ReadingCaps {
    pub const STANDARD: ReadingCaps = ReadingCaps {
        page_words_target: [
            WordRange::new(70, 90),
            WordRange::new(110, 140),
            WordRange::new(90, 110),
            WordRange::new(60, 80),
        ],
    };

    pub fn target(&self, page: usize) -> Option<WordRange> {
        self.page_words_target.get(page).copied()
    }

    /// Pages whose word count misses their target, as `(page index, words)`.
    pub fn pages_off_target(&self, pages: &ReadingPages) -> Vec<(usize, usize)> {
        pages
            .as_slice()
            .iter()
            .zip(self.page_words_target.iter())
            .enumerate()
            .filter_map(|(i, (text, range))| {
                let words = text.split_whitespace().count();
                (!range.contains(words)).then_some((i, words))
            })
            .collect()
    }
}

impl Default for ReadingCaps {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCard {
    pub title: String,
    pub text: String,
}

impl ShareCard {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            title: SHARE_TITLE.to_string(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("page {}", i)).collect()
    }

    #[test]
    fn pages_require_exactly_four() {
        assert!(ReadingPages::try_from(pages(4)).is_ok());
        assert!(matches!(
            ReadingPages::try_from(pages(3)),
            Err(GenerationError::InvalidArtifact(_))
        ));
        assert!(ReadingPages::try_from(pages(5)).is_err());
    }

    #[test]
    fn pages_deserialize_with_count_check() {
        let ok: ReadingPages = serde_json::from_str(r#"["a","b","c","d"]"#).unwrap();
        assert_eq!(ok.last(), "d");
        assert!(serde_json::from_str::<ReadingPages>(r#"["a","b"]"#).is_err());
    }

    #[test]
    fn titled_pairs_headings_in_order() {
        let p = ReadingPages::try_from(pages(4)).unwrap();
        let titles: Vec<_> = p.titled().map(|(t, _)| t).collect();
        assert_eq!(titles, PAGE_TITLES.to_vec());
    }

    #[test]
    fn caps_flag_pages_outside_their_word_targets() {
        let words = |n: usize| vec!["word"; n].join(" ");
        let pages = ReadingPages::new([words(80), words(20), words(100), words(81)]);

        let off = ReadingCaps::STANDARD.pages_off_target(&pages);
        assert_eq!(off, vec![(1, 20), (3, 81)]);
        assert_eq!(ReadingCaps::default().target(1), Some(WordRange::new(110, 140)));
        assert_eq!(ReadingCaps::STANDARD.target(4), None);
    }

    #[test]
    fn caps_default_when_missing_from_json() {
        let json = serde_json::json!({
            "meta": ReadingMeta::new(DrawId::new(), Timestamp::now(), "template"),
            "cards": [],
            "cosmic": crate::domain::cosmic::compute(
                chrono::NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
                None,
            ),
            "pages": ["a", "b", "c", "d"],
            "share": ShareCard::new("s"),
        });
        let artifact: ReadingArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(artifact.caps, ReadingCaps::STANDARD);

        let round = serde_json::to_value(&artifact).unwrap();
        assert_eq!(round["caps"]["pageWordsTarget"][0]["min"], 70);
    }

    #[test]
    fn meta_carries_disclaimer() {
        let meta = ReadingMeta::new(DrawId::new(), Timestamp::now(), "template");
        assert_eq!(meta.disclaimer, DISCLAIMER);
        assert_eq!(meta.locale, "en");
    }
}
