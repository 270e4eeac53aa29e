//! DrawApp - composition root wiring store, clock and reading generator.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::adapters::ai::{OpenAIConfig, OpenAIProvider};
use crate::adapters::clock::SystemClock;
use crate::adapters::reading::{
    FailureMode, GuardedReadingGenerator, LlmReadingGenerator, TemplateReadingGenerator,
};
use crate::adapters::storage::InMemorySessionStore;
use crate::config::{AppConfig, ReadingConfig, ReadingMode};
use crate::domain::reading::ArtifactPolicy;
use crate::ports::{AIError, Clock, ReadingGenerator, SessionStore};

use super::handlers::draw::{
    CompleteDrawHandler, GetDrawHandler, GetReadingHandler, RevealCardHandler,
    ShuffleDeckHandler, StartDrawHandler, ToggleCardHandler,
};
use super::sweeper::spawn_session_sweeper;

/// Shared dependencies for the draw handlers.
#[derive(Clone)]
pub struct DrawApp {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    generator: Arc<dyn ReadingGenerator>,
    ttl: Duration,
    sweep_interval: Option<Duration>,
}

impl DrawApp {
    pub fn new(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        generator: Arc<dyn ReadingGenerator>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            generator,
            ttl,
            sweep_interval: None,
        }
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Builds the app from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `AIError` if the LLM provider client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, AIError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = Arc::new(InMemorySessionStore::new(
            config.session.max_sessions,
            clock.clone(),
        ));
        let generator = build_generator(&config.reading, clock.clone())?;

        tracing::debug!(
            generator = %generator.name(),
            ttl_secs = config.session.ttl_secs,
            max_sessions = config.session.max_sessions,
            "Draw app configured"
        );

        let app = Self::new(store, clock, generator, config.session.ttl());
        Ok(match config.session.sweep_interval() {
            Some(interval) => app.with_sweep_interval(interval),
            None => app,
        })
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn generator(&self) -> &Arc<dyn ReadingGenerator> {
        &self.generator
    }

    pub fn start_draw(&self) -> StartDrawHandler {
        StartDrawHandler::new(self.store.clone(), self.clock.clone(), self.ttl)
    }

    pub fn shuffle_deck(&self) -> ShuffleDeckHandler {
        ShuffleDeckHandler::new(self.store.clone())
    }

    pub fn toggle_card(&self) -> ToggleCardHandler {
        ToggleCardHandler::new(self.store.clone())
    }

    pub fn reveal_card(&self) -> RevealCardHandler {
        RevealCardHandler::new(self.store.clone())
    }

    pub fn complete_draw(&self) -> CompleteDrawHandler {
        CompleteDrawHandler::new(
            self.store.clone(),
            self.generator.clone(),
            self.clock.clone(),
        )
    }

    pub fn get_draw(&self) -> GetDrawHandler {
        GetDrawHandler::new(self.store.clone())
    }

    pub fn get_reading(&self) -> GetReadingHandler {
        GetReadingHandler::new(self.store.clone())
    }

    /// Spawns the periodic sweeper if an interval is configured.
    pub fn spawn_sweeper(&self, shutdown: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
        self.sweep_interval
            .map(|interval| spawn_session_sweeper(self.store.clone(), interval, shutdown))
    }
}

fn build_generator(
    config: &ReadingConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn ReadingGenerator>, AIError> {
    let template = TemplateReadingGenerator::new(clock.clone());
    let mode = if config.hard_fail {
        FailureMode::HardFail
    } else {
        FailureMode::Fallback
    };
    let mut guarded = GuardedReadingGenerator::new(template, config.timeout())
        .with_policy(ArtifactPolicy {
            ascii_share_text: config.ascii_share_text,
        })
        .with_mode(mode);

    if config.mode == ReadingMode::Llm {
        let api_key = config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| AIError::InvalidRequest("OpenAI API key is not configured".into()))?;
        let provider = OpenAIProvider::new(
            OpenAIConfig::from_secret(api_key.clone())
                .with_model(config.model.clone())
                .with_base_url(config.base_url.clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries),
        )?;
        let llm = LlmReadingGenerator::new(Arc::new(provider), clock)
            .with_temperature(config.temperature);
        guarded = guarded.with_primary(Arc::new(llm));
    }

    Ok(Arc::new(guarded))
}
