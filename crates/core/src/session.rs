use crate::{
    compose, Advance, Card, CardId, CardPool, Catalog, ComposeError, CountTable, CursorError,
    Deck, Difficulty, Event, EventBus, InPlay, InsertPosition, MutationError, Progress,
    RandomSource, RngState, RuleSet, SessionSnapshot, Settings, SnapshotError, TypeCache,
    TypeCategory, SNAPSHOT_VERSION,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0}")]
    Compose(#[from] ComposeError),
    #[error("{0}")]
    Cursor(#[from] CursorError),
    #[error("{0}")]
    Mutation(#[from] MutationError),
    #[error("{0}")]
    Snapshot(#[from] SnapshotError),
    #[error("unknown difficulty {0}")]
    UnknownDifficulty(usize),
    #[error("card {0} is not in the selected games")]
    UnknownCard(CardId),
    #[error("card {0} is not in play")]
    NotInPlay(CardId),
}

/// One player's deck session: settings, the pool they select, and the deck
/// built from it.
///
/// Successful operations return the event describing the change and also
/// queue it; callers drain the queue to know when to save.
#[derive(Debug)]
pub struct Session<R = RngState> {
    catalog: Catalog,
    difficulties: Vec<Difficulty>,
    rules: RuleSet,
    settings: Settings,
    pool: CardPool,
    types: TypeCache,
    deck: Deck,
    in_play: InPlay,
    rng: R,
    events: EventBus,
}

impl<R: RandomSource> Session<R> {
    pub fn new(catalog: Catalog, difficulties: Vec<Difficulty>, rules: RuleSet, rng: R) -> Self {
        Self {
            catalog,
            difficulties,
            rules,
            settings: Settings::default(),
            pool: CardPool::default(),
            types: TypeCache::new(),
            deck: Deck::default(),
            in_play: InPlay::default(),
            rng,
            events: EventBus::default(),
        }
    }

    pub fn restore(
        catalog: Catalog,
        difficulties: Vec<Difficulty>,
        rules: RuleSet,
        snapshot: &SessionSnapshot,
        rng: R,
    ) -> Result<Self, SnapshotError> {
        snapshot.check_version()?;
        let deck = Deck::from_snapshot(&snapshot.deck_state)?;
        let pool = CardPool::from_catalog(&catalog, &snapshot.settings.selected_games);
        Ok(Self {
            catalog,
            difficulties,
            rules,
            settings: snapshot.settings.clone(),
            pool,
            types: TypeCache::new(),
            deck,
            in_play: InPlay::from_cards(snapshot.deck_state.in_play_cards.clone()),
            rng,
            events: EventBus::default(),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            settings: self.settings.clone(),
            deck_state: self.deck.to_snapshot(&self.in_play),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn difficulties(&self) -> &[Difficulty] {
        &self.difficulties
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pool(&self) -> &CardPool {
        &self.pool
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn in_play(&self) -> &InPlay {
        &self.in_play
    }

    pub fn progress(&self) -> Progress {
        self.deck.progress()
    }

    pub fn search(&self, query: &str) -> Vec<&Card> {
        self.pool.search(query)
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain().collect()
    }

    fn emit(&mut self, event: Event) -> Event {
        self.events.push(event.clone());
        event
    }

    /// Rebuilds the pool. The current deck is kept until the next compose.
    pub fn select_games(&mut self, games: Vec<String>) -> Event {
        self.pool = CardPool::from_catalog(&self.catalog, &games);
        self.types.clear();
        let event = Event::GamesSelected {
            games: games.len(),
            pool: self.pool.len(),
        };
        self.settings.selected_games = games;
        self.emit(event)
    }

    /// Stores a requested count in the table its type belongs to.
    pub fn set_count(&mut self, card_type: &str, count: u32) -> Event {
        let table = match self.rules.category(card_type) {
            TypeCategory::Regular => &mut self.settings.card_counts,
            TypeCategory::Reserve | TypeCategory::Special => {
                &mut self.settings.special_card_counts
            }
        };
        table.insert(card_type.to_string(), count);
        self.emit(Event::CountSet {
            card_type: card_type.to_string(),
            count,
        })
    }

    pub fn requested_counts(&self) -> CountTable {
        self.settings.requested_counts()
    }

    pub fn select_difficulty(&mut self, index: usize) -> Result<Event, SessionError> {
        let difficulty = self
            .difficulties
            .get(index)
            .ok_or(SessionError::UnknownDifficulty(index))?;
        difficulty.apply_to(&mut self.settings.card_counts);
        let name = difficulty.name.clone();
        self.settings.selected_difficulty_index = index;
        Ok(self.emit(Event::DifficultySelected { name }))
    }

    pub fn set_reserve_rules(&mut self, enabled: bool) -> Event {
        self.settings.enable_reserve_rules = enabled;
        self.emit(Event::ReserveRulesSet { enabled })
    }

    pub fn set_special_rules(&mut self, enabled: bool) -> Event {
        self.settings.enable_special_rules = enabled;
        self.emit(Event::SpecialRulesSet { enabled })
    }

    /// Replaces the deck, discard pile and reserve with a fresh composition.
    /// On failure the previous deck stays as it was. Requested types that
    /// came up short are listed in the returned event.
    pub fn compose_deck(&mut self) -> Result<Event, SessionError> {
        if self.settings.selected_games.is_empty() {
            return Err(ComposeError::NoGamesSelected.into());
        }
        let options = self.rules.compose_options(
            self.settings.enable_reserve_rules,
            self.settings.enable_special_rules,
        );
        let composition = compose(
            &self.pool,
            &self.settings.requested_counts(),
            &self.rules,
            &options,
            &mut self.types,
            &mut self.rng,
        )?;
        let event = Event::DeckComposed {
            size: composition.active.len(),
            reserve: composition.reserve.len(),
            held_back: composition.held_back.len(),
            shortfalls: composition.shortfalls.clone(),
        };
        self.deck = Deck::from_composition(composition);
        Ok(self.emit(event))
    }

    pub fn advance(&mut self) -> Result<Event, SessionError> {
        let event = match self.deck.advance(&mut self.rng)? {
            Advance::Moved(index) => Event::CardShown {
                index,
                total: self.deck.cards().len(),
            },
            Advance::Reshuffled => Event::DeckReshuffled {
                size: self.deck.cards().len(),
            },
        };
        Ok(self.emit(event))
    }

    /// `None` when already before the first card.
    pub fn retreat(&mut self) -> Option<Event> {
        if !self.deck.retreat() {
            return None;
        }
        let index = self.deck.current_index();
        Some(self.emit(Event::Retreated { index }))
    }

    pub fn clear(&mut self) -> Event {
        self.deck.clear();
        self.emit(Event::DeckCleared)
    }

    pub fn shuffle_anywhere(&mut self) -> Result<Event, SessionError> {
        let event = self.deck.shuffle_anywhere(&mut self.rng)?;
        Ok(self.emit(event))
    }

    pub fn shuffle_top(&mut self, top: usize) -> Result<Event, SessionError> {
        let event = self.deck.shuffle_top(top, &mut self.rng)?;
        Ok(self.emit(event))
    }

    pub fn replace_same_type(&mut self) -> Result<Event, SessionError> {
        let event = self
            .deck
            .replace_same_type(&self.pool, &mut self.types, &mut self.rng)?;
        Ok(self.emit(event))
    }

    pub fn introduce_reserve(&mut self) -> Result<Event, SessionError> {
        let event = self.deck.introduce_reserve(&mut self.rng)?;
        Ok(self.emit(event))
    }

    pub fn insert_by_type(
        &mut self,
        card_type: &str,
        specific: Option<CardId>,
        position: InsertPosition,
    ) -> Result<Event, SessionError> {
        let event = self.deck.insert_by_type(
            card_type,
            specific,
            position,
            &self.pool,
            &mut self.types,
            &mut self.rng,
        )?;
        Ok(self.emit(event))
    }

    /// Flags a pool card as in play. Adding a card twice is not an error.
    pub fn add_in_play(&mut self, id: CardId) -> Result<Option<Event>, SessionError> {
        let card = self.pool.get(id).ok_or(SessionError::UnknownCard(id))?.clone();
        let name = card.card.clone();
        if !self.in_play.add(card) {
            return Ok(None);
        }
        Ok(Some(self.emit(Event::InPlayAdded { id, card: name })))
    }

    pub fn remove_in_play(&mut self, id: CardId) -> Result<Event, SessionError> {
        let card = self.in_play.remove(id).ok_or(SessionError::NotInPlay(id))?;
        Ok(self.emit(Event::InPlayRemoved {
            id,
            card: card.card,
        }))
    }

    pub fn clear_in_play(&mut self) -> Event {
        self.in_play.clear();
        self.emit(Event::InPlayCleared)
    }
}
