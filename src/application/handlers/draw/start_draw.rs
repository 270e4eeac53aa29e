//! StartDrawHandler - Command handler for opening a new draw.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::cosmic::{CosmicContext, ZodiacSign};
use crate::domain::deck::DeckOrder;
use crate::domain::draw::{parse_birthdate, DrawError, DrawInput, DrawPhase, DrawSession, SpreadSize};
use crate::domain::foundation::{DrawId, Timestamp};
use crate::ports::{Clock, SessionStore};

/// Command to start a draw.
#[derive(Debug, Clone)]
pub struct StartDrawCommand {
    pub name: String,
    pub question: String,
    pub spread_size: u8,
    /// Zodiac sign name, e.g. "leo".
    pub zodiac: Option<String>,
    /// Birthdate as `YYYY-MM-DD`; used for the sign when none is given.
    pub birthdate: Option<String>,
}

/// Result of starting a draw.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDrawResult {
    pub draw_id: DrawId,
    pub phase: DrawPhase,
    pub spread: SpreadSize,
    pub cosmic: CosmicContext,
    pub expires_at: Timestamp,
}

/// Handler for starting draws.
pub struct StartDrawHandler {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl StartDrawHandler {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    pub async fn handle(&self, cmd: StartDrawCommand) -> Result<StartDrawResult, DrawError> {
        // 1. Validate input
        let input = Self::build_input(cmd).map_err(|e| {
            tracing::debug!(code = %e.code(), error = %e, "Draw start rejected");
            e
        })?;

        // 2. Open the session over a fresh shuffle
        let session = DrawSession::start(
            DrawId::new(),
            input,
            DeckOrder::shuffled(),
            self.clock.now(),
            self.ttl,
        );

        // 3. Persist
        self.store.create(session.clone()).await?;

        tracing::debug!(
            draw_id = %session.id(),
            spread = %session.input().spread(),
            descriptor = %session.cosmic().descriptor,
            "Draw started"
        );

        Ok(StartDrawResult {
            draw_id: session.id(),
            phase: session.phase(),
            spread: session.input().spread(),
            cosmic: session.cosmic().clone(),
            expires_at: session.expires_at(),
        })
    }

    fn build_input(cmd: StartDrawCommand) -> Result<DrawInput, DrawError> {
        let spread = SpreadSize::try_from(cmd.spread_size)?;
        let mut input = DrawInput::new(cmd.name, cmd.question, spread)?;

        if let Some(raw) = non_blank(cmd.zodiac.as_deref()) {
            input = input.with_zodiac(raw.parse::<ZodiacSign>()?);
        }
        if let Some(raw) = non_blank(cmd.birthdate.as_deref()) {
            input = input.with_birthdate(parse_birthdate(raw)?);
        }

        Ok(input)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::draw::test_support::{Fixture, TTL};
    use crate::domain::foundation::{ErrorCode, ValidationError};

    fn command(spread_size: u8) -> StartDrawCommand {
        StartDrawCommand {
            name: "Ada".to_string(),
            question: "Where does this lead?".to_string(),
            spread_size,
            zodiac: None,
            birthdate: None,
        }
    }

    fn handler(fx: &Fixture) -> StartDrawHandler {
        StartDrawHandler::new(fx.store.clone(), fx.clock(), TTL)
    }

    #[tokio::test]
    async fn starts_shuffled_draw_with_expiry() {
        let fx = Fixture::new();
        let result = handler(&fx).handle(command(3)).await.unwrap();

        assert_eq!(result.phase, DrawPhase::Shuffled);
        assert_eq!(result.spread, SpreadSize::Three);
        assert_eq!(result.expires_at, fx.clock.now().plus(TTL));

        let stored = fx.store.get(result.draw_id).await.unwrap();
        assert!(stored.deck_order().is_complete_permutation());
        assert!(stored.selected().is_empty());
    }

    #[tokio::test]
    async fn rejects_unsupported_spread() {
        let fx = Fixture::new();
        let err = handler(&fx).handle(command(4)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(fx.store.len().await, 0);
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let fx = Fixture::new();
        let cmd = StartDrawCommand {
            name: "   ".to_string(),
            ..command(3)
        };
        let err = handler(&fx).handle(cmd).await.unwrap_err();
        assert_eq!(
            err,
            DrawError::Validation(ValidationError::empty_field("name"))
        );
    }

    #[tokio::test]
    async fn explicit_zodiac_is_carried_into_cosmic_context() {
        let fx = Fixture::new();
        let cmd = StartDrawCommand {
            zodiac: Some("Leo".to_string()),
            birthdate: Some("1990-01-01".to_string()),
            ..command(5)
        };
        let result = handler(&fx).handle(cmd).await.unwrap();
        assert_eq!(result.cosmic.zodiac, Some(ZodiacSign::Leo));
    }

    #[tokio::test]
    async fn zodiac_falls_back_to_birthdate() {
        let fx = Fixture::new();
        let cmd = StartDrawCommand {
            birthdate: Some("1990-01-01".to_string()),
            ..command(3)
        };
        let result = handler(&fx).handle(cmd).await.unwrap();
        assert_eq!(result.cosmic.zodiac, Some(ZodiacSign::Capricorn));
    }

    #[tokio::test]
    async fn malformed_birthdate_is_rejected() {
        let fx = Fixture::new();
        let cmd = StartDrawCommand {
            birthdate: Some("01/01/1990".to_string()),
            ..command(3)
        };
        let err = handler(&fx).handle(cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn blank_optional_fields_are_ignored() {
        let fx = Fixture::new();
        let cmd = StartDrawCommand {
            zodiac: Some(" ".to_string()),
            birthdate: Some(String::new()),
            ..command(3)
        };
        let result = handler(&fx).handle(cmd).await.unwrap();
        assert_eq!(result.cosmic.zodiac, None);
    }
}
