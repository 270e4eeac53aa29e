//! Shape checks applied to every artifact before it is accepted.

use crate::domain::foundation::CardId;

use super::{GenerationError, ReadingArtifact};

/// Constraints a generated artifact must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactPolicy {
    /// Share text restricted to printable ASCII (newlines allowed).
    pub ascii_share_text: bool,
}

impl Default for ArtifactPolicy {
    fn default() -> Self {
        Self {
            ascii_share_text: true,
        }
    }
}

impl ArtifactPolicy {
    /// Checks page content, share text and that the card list matches `expected`.
    pub fn validate(
        &self,
        artifact: &ReadingArtifact,
        expected: &[CardId],
    ) -> Result<(), GenerationError> {
        if let Some(idx) = artifact
            .pages
            .as_slice()
            .iter()
            .position(|p| p.trim().is_empty())
        {
            return Err(invalid(format!("page {} is empty", idx + 1)));
        }

        let share = &artifact.share.text;
        if share.trim().is_empty() {
            return Err(invalid("share text is empty"));
        }
        if self.ascii_share_text && !is_safe_ascii(share) {
            return Err(invalid("share text must be printable ASCII"));
        }

        if !artifact.card_ids().eq(expected.iter()) {
            return Err(invalid("cards do not match the draw's selection"));
        }

        Ok(())
    }
}

/// Printable ASCII plus line breaks.
pub fn is_safe_ascii(text: &str) -> bool {
    text.chars()
        .all(|c| c == '\n' || c == '\r' || (c.is_ascii() && !c.is_ascii_control()))
}

fn invalid(reason: impl Into<String>) -> GenerationError {
    GenerationError::InvalidArtifact(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cosmic;
    use crate::domain::foundation::{DrawId, Timestamp};
    use crate::domain::reading::{ReadingCaps, ReadingCard, ReadingMeta, ReadingPages, ShareCard};
    use chrono::NaiveDate;

    fn card(pos: usize, id: &str) -> ReadingCard {
        ReadingCard {
            position: pos,
            card_id: CardId::new(id).unwrap(),
            display_name: id.to_string(),
            symbol: String::new(),
        }
    }

    fn artifact(share: &str) -> ReadingArtifact {
        ReadingArtifact {
            meta: ReadingMeta::new(DrawId::new(), Timestamp::now(), "test"),
            cards: vec![card(0, "L01"), card(1, "L02")],
            cosmic: cosmic::compute(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(), None),
            pages: ReadingPages::new([
                "a".into(),
                "b".into(),
                "c".into(),
                "d".into(),
            ]),
            share: ShareCard::new(share),
            image_prompt: None,
            caps: ReadingCaps::default(),
        }
    }

    fn expected() -> Vec<CardId> {
        vec![CardId::new("L01").unwrap(), CardId::new("L02").unwrap()]
    }

    #[test]
    fn accepts_well_formed_artifact() {
        let policy = ArtifactPolicy::default();
        assert!(policy.validate(&artifact("Rider then Clover.\nReflect."), &expected()).is_ok());
    }

    #[test]
    fn rejects_non_ascii_share_text_when_configured() {
        let policy = ArtifactPolicy::default();
        assert!(policy.validate(&artifact("stars ✨"), &expected()).is_err());

        let lenient = ArtifactPolicy {
            ascii_share_text: false,
        };
        assert!(lenient.validate(&artifact("stars ✨"), &expected()).is_ok());
    }

    #[test]
    fn rejects_blank_page() {
        let mut a = artifact("ok");
        a.pages = ReadingPages::new(["a".into(), " ".into(), "c".into(), "d".into()]);
        let err = ArtifactPolicy::default().validate(&a, &expected()).unwrap_err();
        assert_eq!(err, GenerationError::InvalidArtifact("page 2 is empty".into()));
    }

    #[test]
    fn rejects_reordered_cards() {
        let mut exp = expected();
        exp.reverse();
        assert!(ArtifactPolicy::default().validate(&artifact("ok"), &exp).is_err());
    }

    #[test]
    fn safe_ascii_allows_newlines_but_not_tabs() {
        assert!(is_safe_ascii("a\nb"));
        assert!(!is_safe_ascii("a\tb"));
        assert!(!is_safe_ascii("é"));
    }
}
