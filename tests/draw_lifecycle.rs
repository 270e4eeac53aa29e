//! Integration tests for the draw lifecycle.
//!
//! These tests drive the handlers end to end:
//! 1. Start a draw, shuffle, pick and reveal cards
//! 2. Complete the draw and read the stored reading back
//! 3. Concurrency, expiry, capacity and generator failure behaviour
//!
//! Uses the in-memory store and a manual clock, so no external services are needed.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cosmo_draw::adapters::{
    FailureMode, GuardedReadingGenerator, InMemorySessionStore, LlmReadingGenerator, ManualClock,
    MockAIProvider, TemplateReadingGenerator,
};
use cosmo_draw::application::{
    CardChoice, CompleteDrawCommand, DrawApp, GetDrawQuery, GetReadingQuery, RevealCardCommand,
    ShuffleDeckCommand, StartDrawCommand, ToggleCardCommand,
};
use cosmo_draw::domain::draw::{DrawError, DrawPhase, DrawSession, PhaseConflict};
use cosmo_draw::domain::foundation::{DrawId, ErrorCode, Timestamp};
use cosmo_draw::domain::reading::{GenerationError, ReadingArtifact};
use cosmo_draw::ports::{AIError, Clock, ReadingGenerator, SessionStore};

const TTL: Duration = Duration::from_secs(60 * 60);

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Template generator that counts calls and takes a moment to answer.
struct CountingGenerator {
    inner: TemplateReadingGenerator,
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingGenerator {
    fn new(clock: Arc<dyn Clock>, delay: Duration) -> Self {
        Self {
            inner: TemplateReadingGenerator::new(clock),
            calls: AtomicUsize::new(0),
            delay,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReadingGenerator for CountingGenerator {
    async fn generate(&self, session: &DrawSession) -> Result<ReadingArtifact, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.generate(session).await
    }

    fn name(&self) -> String {
        "counting".to_string()
    }
}

struct Harness {
    app: DrawApp,
    clock: Arc<ManualClock>,
    store: Arc<InMemorySessionStore>,
}

impl Harness {
    fn with_generator(
        max_sessions: usize,
        generator: impl FnOnce(Arc<dyn Clock>) -> Arc<dyn ReadingGenerator>,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(Timestamp::now()));
        let store = Arc::new(InMemorySessionStore::new(max_sessions, clock.clone()));
        let shared_clock: Arc<dyn Clock> = clock.clone();
        let generator = generator(shared_clock.clone());
        let app = DrawApp::new(store.clone(), shared_clock, generator, TTL);
        Self { app, clock, store }
    }

    fn new() -> Self {
        Self::with_generator(100, |clock| {
            Arc::new(GuardedReadingGenerator::new(
                TemplateReadingGenerator::new(clock),
                Duration::from_secs(5),
            ))
        })
    }

    async fn start(&self, spread_size: u8) -> DrawId {
        self.app
            .start_draw()
            .handle(StartDrawCommand {
                name: "Ada".to_string(),
                question: "What is changing at work?".to_string(),
                spread_size,
                zodiac: None,
                birthdate: None,
            })
            .await
            .unwrap()
            .draw_id
    }

    async fn toggle_index(&self, draw_id: DrawId, index: usize) -> Result<(), DrawError> {
        self.app
            .toggle_card()
            .handle(ToggleCardCommand {
                draw_id,
                card: CardChoice::DeckIndex(index),
            })
            .await
            .map(|_| ())
    }

    async fn reveal(&self, draw_id: DrawId, position: usize) -> Result<(), DrawError> {
        self.app
            .reveal_card()
            .handle(RevealCardCommand { draw_id, position })
            .await
            .map(|_| ())
    }

    async fn revealed_draw(&self, spread_size: u8) -> DrawId {
        let id = self.start(spread_size).await;
        for idx in 0..spread_size as usize {
            self.toggle_index(id, idx).await.unwrap();
        }
        for pos in 0..spread_size as usize {
            self.reveal(id, pos).await.unwrap();
        }
        id
    }
}

// =============================================================================
// End-to-end flow
// =============================================================================

#[tokio::test]
async fn three_card_draw_runs_from_shuffle_to_reading() {
    let h = Harness::new();
    let id = h.start(3).await;

    let shuffled = h
        .app
        .shuffle_deck()
        .handle(ShuffleDeckCommand { draw_id: id })
        .await
        .unwrap();
    assert_eq!(shuffled.phase, DrawPhase::Shuffled);

    for idx in 0..3 {
        h.toggle_index(id, idx).await.unwrap();
    }
    let picked = h.app.get_draw().handle(GetDrawQuery { draw_id: id }).await.unwrap();
    assert_eq!(picked.phase, DrawPhase::Picking);
    let selection: Vec<_> = picked.selected.iter().map(|c| c.card_id.clone()).collect();

    for pos in 0..3 {
        h.reveal(id, pos).await.unwrap();
    }

    let completed = h
        .app
        .complete_draw()
        .handle(CompleteDrawCommand { draw_id: id })
        .await
        .unwrap();
    assert_eq!(completed.phase, DrawPhase::Complete);
    assert!(completed.newly_generated);
    assert_eq!(completed.reading.pages.as_slice().len(), 4);
    assert!(completed.reading.pages.as_slice().iter().all(|p| !p.is_empty()));
    assert_eq!(
        completed.reading.card_ids().cloned().collect::<Vec<_>>(),
        selection
    );

    let view = h.app.get_draw().handle(GetDrawQuery { draw_id: id }).await.unwrap();
    assert_eq!(view.phase, DrawPhase::Complete);
    assert!(view.reading_available);

    let reading = h
        .app
        .get_reading()
        .handle(GetReadingQuery { draw_id: id })
        .await
        .unwrap();
    assert_eq!(reading, completed.reading);
}

#[tokio::test]
async fn deselect_then_reselect_keeps_positions_dense() {
    let h = Harness::new();
    let id = h.start(3).await;
    for idx in 0..3 {
        h.toggle_index(id, idx).await.unwrap();
    }
    h.toggle_index(id, 1).await.unwrap();

    let view = h.app.get_draw().handle(GetDrawQuery { draw_id: id }).await.unwrap();
    let positions: Vec<_> = view.selected.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(view.phase, DrawPhase::Picking);

    // Still picking, so the reveal must wait for a full selection.
    let err = h.reveal(id, 0).await.unwrap_err();
    assert!(matches!(
        err,
        DrawError::PhaseConflict {
            conflict: PhaseConflict::SelectionIncomplete { .. },
            ..
        }
    ));
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_both_land() {
    let h = Arc::new(Harness::new());
    let id = h.start(3).await;

    let a = {
        let h = h.clone();
        tokio::spawn(async move { h.toggle_index(id, 4).await })
    };
    let b = {
        let h = h.clone();
        tokio::spawn(async move { h.toggle_index(id, 9).await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let session = h.store.get(id).await.unwrap();
    let positions: Vec<_> = session.selected().iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![0, 1]);
    session.check_invariants().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_completions_invoke_generator_once() {
    let counting = Arc::new(std::sync::OnceLock::new());
    let slot = counting.clone();
    let h = Arc::new(Harness::with_generator(100, move |clock| {
        let gen = Arc::new(CountingGenerator::new(clock, Duration::from_millis(30)));
        let _ = slot.set(gen.clone());
        gen
    }));
    let generator: Arc<CountingGenerator> = counting.get().cloned().unwrap();
    let id = h.revealed_draw(5).await;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let h = h.clone();
            tokio::spawn(async move {
                h.app
                    .complete_draw()
                    .handle(CompleteDrawCommand { draw_id: id })
                    .await
            })
        })
        .collect();

    let mut readings = Vec::new();
    let mut fresh = 0;
    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        if result.newly_generated {
            fresh += 1;
        }
        readings.push(result.reading);
    }

    assert_eq!(generator.calls(), 1);
    assert_eq!(fresh, 1);
    assert!(readings.windows(2).all(|w| w[0] == w[1]));
}

// =============================================================================
// Expiry and capacity
// =============================================================================

#[tokio::test]
async fn expired_draw_rejects_every_operation() {
    let h = Harness::new();
    let id = h.revealed_draw(3).await;
    h.clock.advance(TTL + Duration::from_millis(1));

    let get = h.app.get_draw().handle(GetDrawQuery { draw_id: id }).await;
    assert_eq!(get.unwrap_err(), DrawError::NotFoundOrExpired);

    let shuffle = h
        .app
        .shuffle_deck()
        .handle(ShuffleDeckCommand { draw_id: id })
        .await;
    assert_eq!(shuffle.unwrap_err(), DrawError::NotFoundOrExpired);

    assert_eq!(h.toggle_index(id, 0).await.unwrap_err(), DrawError::NotFoundOrExpired);
    assert_eq!(h.reveal(id, 0).await.unwrap_err(), DrawError::NotFoundOrExpired);

    let complete = h
        .app
        .complete_draw()
        .handle(CompleteDrawCommand { draw_id: id })
        .await;
    assert_eq!(complete.unwrap_err().code(), ErrorCode::DrawNotFound);

    let reading = h
        .app
        .get_reading()
        .handle(GetReadingQuery { draw_id: id })
        .await;
    assert_eq!(reading.unwrap_err(), DrawError::NotFoundOrExpired);
}

#[tokio::test]
async fn draw_is_usable_just_before_expiry() {
    let h = Harness::new();
    let id = h.start(3).await;
    h.clock.advance(TTL - Duration::from_secs(1));
    h.toggle_index(id, 0).await.unwrap();
}

#[tokio::test]
async fn capacity_evicts_oldest_draw_first() {
    let h = Harness::with_generator(2, |clock| {
        Arc::new(GuardedReadingGenerator::new(
            TemplateReadingGenerator::new(clock),
            Duration::from_secs(5),
        ))
    });

    let first = h.start(3).await;
    h.clock.advance(Duration::from_secs(1));
    let second = h.start(3).await;
    h.clock.advance(Duration::from_secs(1));
    let third = h.start(5).await;

    assert_eq!(h.store.len().await, 2);
    assert_eq!(h.store.get(first).await.unwrap_err(), DrawError::NotFoundOrExpired);
    assert!(h.store.get(second).await.is_ok());
    assert!(h.store.get(third).await.is_ok());
}

// =============================================================================
// Generator failures
// =============================================================================

const LLM_REPLY: &str = r#"{
    "frameAndTheme": "Frame",
    "sequenceUnfolding": "Unfolding",
    "implicationsAndTension": "Tension",
    "interpretationAndDirection": "Direction",
    "shareText": "A quiet turn toward what matters."
}"#;

fn llm_harness(provider: MockAIProvider, mode: FailureMode) -> Harness {
    Harness::with_generator(100, move |clock| {
        let llm = LlmReadingGenerator::new(Arc::new(provider), clock.clone());
        Arc::new(
            GuardedReadingGenerator::new(
                TemplateReadingGenerator::new(clock),
                Duration::from_secs(5),
            )
            .with_primary(Arc::new(llm))
            .with_mode(mode),
        )
    })
}

#[tokio::test]
async fn hard_fail_keeps_draw_revealed_until_retry_succeeds() {
    let provider = MockAIProvider::new()
        .then_fail(AIError::Unavailable("overloaded".to_string()))
        .then_text(LLM_REPLY);
    let h = llm_harness(provider.clone(), FailureMode::HardFail);
    let id = h.revealed_draw(3).await;

    let err = h
        .app
        .complete_draw()
        .handle(CompleteDrawCommand { draw_id: id })
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GenerationFailed);
    assert!(err.is_retryable());
    assert_eq!(h.store.get(id).await.unwrap().phase(), DrawPhase::Revealed);

    let retry = h
        .app
        .complete_draw()
        .handle(CompleteDrawCommand { draw_id: id })
        .await
        .unwrap();
    assert_eq!(retry.phase, DrawPhase::Complete);
    assert_eq!(retry.reading.meta.generator, "llm:mock-model-1");
    assert_eq!(retry.reading.pages.as_slice()[0], "Frame");
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn fallback_mode_stores_template_reading() {
    let provider = MockAIProvider::new().then_fail(AIError::AuthenticationFailed);
    let h = llm_harness(provider, FailureMode::Fallback);
    let id = h.revealed_draw(5).await;

    let result = h
        .app
        .complete_draw()
        .handle(CompleteDrawCommand { draw_id: id })
        .await
        .unwrap();
    assert_eq!(result.reading.meta.generator, "template");
    assert_eq!(result.reading.cards.len(), 5);
}

#[tokio::test]
async fn malformed_llm_reply_falls_back() {
    let provider = MockAIProvider::new().then_text("not json at all");
    let h = llm_harness(provider, FailureMode::Fallback);
    let id = h.revealed_draw(3).await;

    let result = h
        .app
        .complete_draw()
        .handle(CompleteDrawCommand { draw_id: id })
        .await
        .unwrap();
    assert_eq!(result.reading.meta.generator, "template");
}
