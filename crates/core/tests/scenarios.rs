use eventdeck_core::{
    Card, CardId, CardPool, Catalog, ComposeError, CursorState, Deck, DeckSnapshot, Difficulty,
    Event, InsertPosition, MutationError, RngState, RuleSet, ScriptedRng, Session, SessionError,
};
use std::collections::{BTreeMap, HashSet};

fn card(id: CardId, kind: &str) -> Card {
    Card::new(id, format!("card {id}"), kind)
}

fn ids(cards: &[Card]) -> Vec<CardId> {
    cards.iter().map(|card| card.id).collect()
}

fn deck_at(cards: Vec<Card>, current: i64, reserve: Vec<Card>) -> Deck {
    let discard = if current > 0 {
        cards[..current as usize].to_vec()
    } else {
        Vec::new()
    };
    Deck::from_snapshot(&DeckSnapshot {
        initial_deck_size: cards.len(),
        current_deck: cards,
        current_index: current,
        discard_pile: discard,
        reserve_deck: reserve,
        in_play_cards: Vec::new(),
    })
    .expect("valid deck")
}

fn catalog() -> Catalog {
    let mut games = BTreeMap::new();
    games.insert(
        "Base".to_string(),
        vec![
            card(1, "Novice"),
            card(2, "Novice"),
            card(3, "Novice"),
            card(4, "Veteran"),
            card(5, "Veteran"),
            card(6, "Sentry"),
            card(7, "Sentry"),
        ],
    );
    games.insert(
        "Expansion".to_string(),
        vec![card(40, "Novice/Veteran"), card(42, "Novice")],
    );
    Catalog { games }
}

fn difficulties() -> Vec<Difficulty> {
    vec![
        Difficulty {
            name: "Easy".to_string(),
            description: "A gentle start".to_string(),
            novice: 2,
            veteran: 1,
        },
        Difficulty {
            name: "Hard".to_string(),
            description: String::new(),
            novice: 1,
            veteran: 2,
        },
    ]
}

fn session(seed: u64) -> Session {
    Session::new(
        catalog(),
        difficulties(),
        RuleSet::default(),
        RngState::from_seed(seed),
    )
}

#[test]
fn shuffle_anywhere_to_the_bottom() {
    let mut deck = deck_at(vec![card(1, "A"), card(2, "B"), card(3, "C")], 0, Vec::new());
    deck.shuffle_anywhere(&mut ScriptedRng::new([2]))
        .expect("shuffle");
    assert_eq!(ids(deck.cards()), vec![2, 3, 1]);
    assert_eq!(deck.cursor(), CursorState::BeforeStart);
}

#[test]
fn compose_novice_and_veteran_counts() {
    let pool = CardPool::from_cards(vec![
        card(1, "Novice"),
        card(2, "Novice"),
        card(3, "Novice"),
        card(4, "Veteran"),
        card(5, "Veteran"),
    ]);
    let counts: eventdeck_core::CountTable = [("Novice".to_string(), 2), ("Veteran".to_string(), 1)]
        .into_iter()
        .collect();
    for seed in 0..20 {
        let composition = eventdeck_core::compose(
            &pool,
            &counts,
            &RuleSet::default(),
            &Default::default(),
            &mut eventdeck_core::TypeCache::new(),
            &mut RngState::from_seed(seed),
        )
        .expect("compose");
        let active = &composition.active;
        assert_eq!(active.len(), 3);
        assert_eq!(active.iter().filter(|card| card.kind == "Novice").count(), 2);
        assert_eq!(active.iter().filter(|card| card.kind == "Veteran").count(), 1);
        assert_eq!(ids(active).into_iter().collect::<HashSet<_>>().len(), 3);
    }
}

#[test]
fn introduce_reserve_keeps_the_past() {
    let mut deck = deck_at(
        vec![card(1, "A"), card(2, "B"), card(3, "C")],
        0,
        vec![card(24, "X"), card(25, "Y")],
    );
    deck.introduce_reserve(&mut RngState::from_seed(4))
        .expect("introduce");
    assert_eq!(deck.cards().len(), 5);
    assert_eq!(deck.cards()[0].id, 1);
    let mut rest = ids(&deck.cards()[1..]);
    rest.sort_unstable();
    assert_eq!(rest, vec![2, 3, 24, 25]);
    assert!(deck.reserve().is_empty());
    assert_eq!(deck.cursor(), CursorState::OnCard(0));
}

#[test]
fn inserting_a_selected_card_is_refused() {
    let pool = CardPool::from_cards(vec![card(41, "Novice"), card(42, "Novice")]);
    let mut deck = deck_at(vec![card(42, "Novice"), card(41, "Novice")], 0, Vec::new());
    let before = ids(deck.cards());
    let err = deck
        .insert_by_type(
            "Novice",
            Some(42),
            InsertPosition::Next,
            &pool,
            &mut eventdeck_core::TypeCache::new(),
            &mut ScriptedRng::default(),
        )
        .unwrap_err();
    assert_eq!(err, MutationError::AlreadyInDeck("card 42".to_string()));
    assert_eq!(err.to_string(), "card 42 is already in the deck");
    assert_eq!(ids(deck.cards()), before);
}

#[test]
fn session_requires_games_before_composing() {
    let mut session = session(1);
    assert_eq!(
        session.compose_deck(),
        Err(SessionError::Compose(ComposeError::NoGamesSelected))
    );
    assert!(session.drain_events().is_empty());
}

#[test]
fn session_plays_through_a_difficulty_preset() {
    let mut session = session(7);
    session.select_games(vec!["Base".to_string()]);
    session.select_difficulty(0).expect("difficulty");
    let event = session.compose_deck().expect("compose");
    assert_eq!(
        event,
        Event::DeckComposed {
            size: 3,
            reserve: 0,
            held_back: 0,
            shortfalls: Vec::new(),
        }
    );
    assert_eq!(session.deck().cursor(), CursorState::BeforeStart);

    for expected in 0..3 {
        let event = session.advance().expect("advance");
        assert_eq!(
            event,
            Event::CardShown {
                index: expected,
                total: 3
            }
        );
    }
    assert_eq!(session.progress().shown, 3);
    assert!(matches!(
        session.advance(),
        Ok(Event::DeckReshuffled { size: 3 })
    ));
    assert_eq!(session.drain_events().len(), 7);
}

#[test]
fn failed_compose_keeps_the_previous_deck() {
    let mut session = session(2);
    session.select_games(vec!["Base".to_string()]);
    session.set_count("Novice", 2);
    session.compose_deck().expect("compose");
    session.advance().expect("advance");
    let before = session.snapshot();

    session.set_count("Novice", 0);
    assert_eq!(
        session.compose_deck(),
        Err(SessionError::Compose(ComposeError::NoCountsRequested))
    );
    assert_eq!(session.snapshot().deck_state, before.deck_state);
}

#[test]
fn reserve_rules_hold_sentries_until_introduced() {
    let mut session = session(3);
    session.select_games(vec!["Base".to_string()]);
    session.set_reserve_rules(true);
    session.set_count("Novice", 2);
    session.set_count("Sentry", 2);
    assert_eq!(session.settings().special_card_counts.get("Sentry"), Some(&2));
    session.compose_deck().expect("compose");
    assert_eq!(session.deck().cards().len(), 2);
    assert_eq!(ids(session.deck().reserve()).len(), 2);

    assert_eq!(
        session.introduce_reserve(),
        Err(SessionError::Mutation(MutationError::NoActiveCard))
    );
    session.advance().expect("advance");
    let event = session.introduce_reserve().expect("introduce");
    assert_eq!(event.to_string(), "2 reserve cards shuffled into the deck");
    assert_eq!(session.deck().cards().len(), 4);
    assert_eq!(
        session.introduce_reserve(),
        Err(SessionError::Mutation(MutationError::ReserveEmpty))
    );
}

#[test]
fn snapshot_restores_the_same_cursor() {
    let mut session = session(5);
    session.select_games(vec!["Base".to_string(), "Expansion".to_string()]);
    session.set_count("Novice", 3);
    session.set_count("Veteran", 2);
    session.compose_deck().expect("compose");
    session.advance().expect("advance");
    session.advance().expect("advance");
    session.add_in_play(42).expect("in play");

    let snapshot = session.snapshot();
    let body = serde_json::to_string(&snapshot).expect("encode");
    let decoded = serde_json::from_str(&body).expect("decode");
    let restored = Session::restore(
        catalog(),
        difficulties(),
        RuleSet::default(),
        &decoded,
        ScriptedRng::default(),
    )
    .expect("restore");

    assert_eq!(restored.deck().cursor(), CursorState::OnCard(1));
    assert_eq!(restored.deck().cards(), session.deck().cards());
    assert_eq!(restored.deck().discard_pile(), session.deck().discard_pile());
    assert_eq!(restored.in_play().cards().len(), 1);
    assert_eq!(restored.pool().len(), 9);
    assert_eq!(restored.snapshot(), snapshot);
}

#[test]
fn in_play_cards_survive_recomposition() {
    let mut session = session(6);
    session.select_games(vec!["Base".to_string()]);
    session.set_count("Novice", 1);
    assert!(session.add_in_play(4).expect("add").is_some());
    assert!(session.add_in_play(4).expect("add again").is_none());
    assert_eq!(session.add_in_play(999), Err(SessionError::UnknownCard(999)));
    session.compose_deck().expect("compose");
    session.compose_deck().expect("compose again");
    assert_eq!(ids(session.in_play().cards()), vec![4]);
    session.remove_in_play(4).expect("remove");
    assert_eq!(session.remove_in_play(4), Err(SessionError::NotInPlay(4)));
}

#[test]
fn unknown_difficulty_is_reported() {
    let mut session = session(8);
    assert_eq!(
        session.select_difficulty(9),
        Err(SessionError::UnknownDifficulty(9))
    );
}

#[test]
fn held_back_cards_can_still_be_inserted() {
    let mut rules = RuleSet::default();
    rules.held_back_types.insert("Veteran".to_string());
    let mut session = Session::new(catalog(), difficulties(), rules, RngState::from_seed(9));
    session.select_games(vec!["Base".to_string()]);
    session.set_count("Novice", 2);
    session.set_count("Veteran", 2);
    session.compose_deck().expect("compose");
    assert!(session
        .deck()
        .cards()
        .iter()
        .all(|card| card.kind == "Novice"));

    session.advance().expect("advance");
    session
        .insert_by_type("Veteran", Some(5), InsertPosition::Next)
        .expect("insert");
    assert_eq!(session.deck().cards()[1].id, 5);
    assert!(session.deck().is_selected(5));
}

#[test]
fn compose_reports_requested_types_with_no_cards() {
    let mut games = BTreeMap::new();
    games.insert(
        "Solo".to_string(),
        vec![card(1, "Novice"), card(2, "Novice"), card(3, "Novice")],
    );
    let mut session = Session::new(
        Catalog { games },
        difficulties(),
        RuleSet::default(),
        RngState::from_seed(11),
    );
    session.select_games(vec!["Solo".to_string()]);
    session.set_count("Novice", 2);
    session.set_count("Veteran", 3);
    let event = session.compose_deck().expect("compose");
    match &event {
        Event::DeckComposed {
            size, shortfalls, ..
        } => {
            assert_eq!(*size, 2);
            assert_eq!(shortfalls.len(), 1);
            assert_eq!(shortfalls[0].card_type, "Veteran");
            assert_eq!(shortfalls[0].requested, 3);
            assert_eq!(shortfalls[0].selected, 0);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        event.to_string(),
        "Deck built with 2 cards; short of Veteran (0 of 3)"
    );
}

#[test]
fn settings_changes_are_queued_for_saving() {
    let mut session = session(12);
    session.set_count("Novice", 4);
    session.set_reserve_rules(true);
    session.set_special_rules(false);
    assert_eq!(
        session.drain_events(),
        vec![
            Event::CountSet {
                card_type: "Novice".to_string(),
                count: 4
            },
            Event::ReserveRulesSet { enabled: true },
            Event::SpecialRulesSet { enabled: false },
        ]
    );
    assert_eq!(session.settings().card_counts.get("Novice"), Some(&4));
    assert!(session.settings().enable_reserve_rules);
}
