//! LLM-backed reading generator.
//!
//! Sends a single JSON-mode completion per draw and maps the reply onto a
//! `ReadingArtifact`. Accepts either the four named sections or a `pages`
//! array of exactly four strings.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::draw::DrawSession;
use crate::domain::reading::{
    GenerationError, ReadingArtifact, ReadingCaps, ReadingMeta, ReadingPages, ShareCard,
};
use crate::ports::{AIProvider, Clock, CompletionRequest, ReadingGenerator};

use super::{image_prompt, reading_cards};

const SYSTEM_PROMPT: &str =
    "You are a Lenormand reader. Always return valid JSON. Never include markdown formatting in JSON.";

const MAX_TOKENS: u32 = 1500;

/// Generator that asks an `AIProvider` for the reading text.
pub struct LlmReadingGenerator {
    provider: Arc<dyn AIProvider>,
    clock: Arc<dyn Clock>,
    temperature: f32,
}

impl LlmReadingGenerator {
    pub fn new(provider: Arc<dyn AIProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builds the user prompt for a revealed draw.
    pub fn build_prompt(session: &DrawSession) -> String {
        let sequence = reading_cards(session)
            .iter()
            .map(|c| format!("{}. {}", c.position + 1, c.display_name))
            .collect::<Vec<_>>()
            .join("\n");
        let cosmic = session.cosmic();
        let caps = ReadingCaps::STANDARD;

        format!(
            r#"Interpret the following card sequence as a combined, relational sequence (not individual card meanings).

Question: "{question}"
Name: {name}
Cosmic context: {descriptor} (metaphor: {metaphor})

Card sequence:
{sequence}

Generate a reading with exactly 4 pages:

1. Frame & Theme ({p1} words): Overall synthesis of the whole sequence + cosmic tone. Reference cards positionally (opening/pivot/final).
2. Sequence Unfolding ({p2} words): Chain logic (A->B->C; relational meaning only).
3. Implications & Tension ({p3} words): What is forming, reinforcing or conflicting. Use interpretive language, never predictive statements.
4. Interpretation & Direction ({p4} words): Declarative, non-predictive conclusion. Reference the cosmic metaphor subtly.

Rules:
- Interpret the cards as one ordered sequence
- No medical, legal or financial directives
- No guarantees or predictions
- shareText must be plain ASCII with no emojis

Return JSON with this structure:
{{
  "frameAndTheme": "...",
  "sequenceUnfolding": "...",
  "implicationsAndTension": "...",
  "interpretationAndDirection": "...",
  "shareText": "2-3 sentence synthesis from page 4"
}}"#,
            question = session.input().question(),
            name = session.input().name(),
            descriptor = cosmic.descriptor,
            metaphor = cosmic.metaphor_phrase(),
            sequence = sequence,
            p1 = caps.page_words_target[0],
            p2 = caps.page_words_target[1],
            p3 = caps.page_words_target[2],
            p4 = caps.page_words_target[3],
        )
    }

    /// Parses the model reply into pages and share text.
    pub fn parse_reply(content: &str) -> Result<(ReadingPages, String), GenerationError> {
        let json = strip_code_fence(content);
        let reply: LlmReply =
            serde_json::from_str(json).map_err(|e| GenerationError::Parse(e.to_string()))?;

        match reply {
            LlmReply::Paged { pages, share_text } => Ok((ReadingPages::try_from(pages)?, share_text)),
            LlmReply::Sectioned {
                frame_and_theme,
                sequence_unfolding,
                implications_and_tension,
                interpretation_and_direction,
                share_text,
            } => Ok((
                ReadingPages::new([
                    frame_and_theme,
                    sequence_unfolding,
                    implications_and_tension,
                    interpretation_and_direction,
                ]),
                share_text,
            )),
        }
    }
}

#[async_trait]
impl ReadingGenerator for LlmReadingGenerator {
    async fn generate(&self, session: &DrawSession) -> Result<ReadingArtifact, GenerationError> {
        let request = CompletionRequest::new(session.id(), Self::build_prompt(session))
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(self.temperature)
            .with_json_output();

        let response = self.provider.complete(request).await?;
        tracing::debug!(
            draw_id = %session.id(),
            model = %response.model,
            tokens = response.usage.total(),
            stop = %response.stop,
            "LLM reading received"
        );
        if !response.stop.is_complete() {
            return Err(GenerationError::InvalidArtifact(format!(
                "reply ended early ({})",
                response.stop
            )));
        }

        let (pages, share_text) = Self::parse_reply(&response.content)?;
        let cards = reading_cards(session);

        Ok(ReadingArtifact {
            meta: ReadingMeta::new(session.id(), self.clock.now(), self.name()),
            image_prompt: Some(image_prompt(session, &cards)),
            cards,
            cosmic: session.cosmic().clone(),
            pages,
            caps: ReadingCaps::STANDARD,
            share: ShareCard::new(share_text.trim()),
        })
    }

    fn name(&self) -> String {
        format!("llm:{}", self.provider.provider_info().model)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LlmReply {
    #[serde(rename_all = "camelCase")]
    Paged {
        pages: Vec<String>,
        share_text: String,
    },
    #[serde(rename_all = "camelCase")]
    Sectioned {
        frame_and_theme: String,
        sequence_unfolding: String,
        implications_and_tension: String,
        interpretation_and_direction: String,
        share_text: String,
    },
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
