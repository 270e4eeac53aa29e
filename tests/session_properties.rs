//! Property tests for the draw session aggregate.
//!
//! Arbitrary action sequences must never break the session's structural
//! invariants, rejected actions must leave the session untouched, and the
//! derived phase may only move along legal edges.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use cosmo_draw::domain::deck::{lookup, DeckOrder};
use cosmo_draw::domain::draw::{DrawInput, DrawSession, SpreadSize};
use cosmo_draw::domain::foundation::{DrawId, StateMachine, Timestamp};
use cosmo_draw::domain::reading::{
    ReadingArtifact, ReadingCaps, ReadingCard, ReadingMeta, ReadingPages, ShareCard,
};

#[derive(Debug, Clone)]
enum Action {
    Shuffle(u64),
    ToggleIndex(usize),
    Reveal(usize),
    Complete,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        1 => any::<u64>().prop_map(Action::Shuffle),
        6 => (0usize..38).prop_map(Action::ToggleIndex),
        4 => (0usize..6).prop_map(Action::Reveal),
        1 => Just(Action::Complete),
    ]
}

fn spread() -> impl Strategy<Value = SpreadSize> {
    prop_oneof![Just(SpreadSize::Three), Just(SpreadSize::Five)]
}

fn artifact_for(session: &DrawSession) -> ReadingArtifact {
    let cards = session
        .selected()
        .iter()
        .map(|c| {
            let entry = lookup(c.card_id.as_str()).unwrap();
            ReadingCard {
                position: c.position,
                card_id: c.card_id.clone(),
                display_name: entry.display_name.to_string(),
                symbol: entry.symbol.to_string(),
            }
        })
        .collect();

    ReadingArtifact {
        meta: ReadingMeta::new(session.id(), Timestamp::now(), "property"),
        cards,
        cosmic: session.cosmic().clone(),
        pages: ReadingPages::new(["a".into(), "b".into(), "c".into(), "d".into()]),
        share: ShareCard::new("share"),
        image_prompt: None,
        caps: ReadingCaps::default(),
    }
}

fn apply(session: &mut DrawSession, action: &Action) -> bool {
    match action {
        Action::Shuffle(seed) => session
            .shuffle(DeckOrder::shuffled_with(&mut StdRng::seed_from_u64(*seed)))
            .is_ok(),
        Action::ToggleIndex(idx) => session.toggle_at_deck_index(*idx).is_ok(),
        Action::Reveal(pos) => session.reveal(*pos).is_ok(),
        Action::Complete => {
            let artifact = artifact_for(session);
            session.record_reading(artifact, Timestamp::now()).is_ok()
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_under_arbitrary_actions(
        spread in spread(),
        actions in prop::collection::vec(action(), 0..60),
    ) {
        let input = DrawInput::new("Ada", "Where to?", spread).unwrap();
        let mut session = DrawSession::start(
            DrawId::new(),
            input,
            DeckOrder::canonical(),
            Timestamp::now(),
            Duration::from_secs(3600),
        );

        for action in &actions {
            let before = session.clone();
            let accepted = apply(&mut session, action);

            prop_assert!(session.check_invariants().is_ok(), "after {:?}", action);

            if accepted {
                let (from, to) = (before.phase(), session.phase());
                prop_assert!(
                    from == to || from.can_transition_to(&to),
                    "illegal edge {} -> {} on {:?}", from, to, action
                );
            } else {
                prop_assert_eq!(&session, &before);
            }
        }
    }

    #[test]
    fn reveal_order_is_strict(
        spread in spread(),
        attempts in prop::collection::vec(0usize..5, 1..20),
    ) {
        let input = DrawInput::new("Ada", "Where to?", spread).unwrap();
        let mut session = DrawSession::start(
            DrawId::new(),
            input,
            DeckOrder::canonical(),
            Timestamp::now(),
            Duration::from_secs(3600),
        );
        for idx in 0..spread.count() {
            session.toggle_at_deck_index(idx).unwrap();
        }

        for pos in attempts {
            let expected = session.next_reveal_position();
            let accepted = session.reveal(pos).is_ok();
            prop_assert_eq!(accepted, expected == Some(pos));
        }
    }
}
