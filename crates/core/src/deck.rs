use crate::{shuffle, Card, CardId, Composition, RandomSource};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Empty,
    BeforeStart,
    OnCard(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    Reshuffled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("the deck is empty")]
    EmptyDeck,
    #[error("no more cards")]
    NoMoreCards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Cards revealed so far, counting the one on display.
    pub shown: usize,
    pub total: usize,
    pub initial: usize,
}

/// The active deck, its cursor and everything composed alongside it.
///
/// The discard pile always equals `cards[..current]`: it is pushed on
/// advance and popped on retreat, never re-derived.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub(crate) cards: Vec<Card>,
    pub(crate) current: Option<usize>,
    pub(crate) discard: Vec<Card>,
    pub(crate) reserve: Vec<Card>,
    pub(crate) selected: HashSet<CardId>,
    pub(crate) initial_size: usize,
}

impl Deck {
    pub fn from_composition(composition: Composition) -> Self {
        Self {
            initial_size: composition.active.len(),
            cards: composition.active,
            current: None,
            discard: Vec::new(),
            reserve: composition.reserve,
            selected: composition.selected,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    pub fn reserve(&self) -> &[Card] {
        &self.reserve
    }

    pub fn is_selected(&self, id: CardId) -> bool {
        self.selected.contains(&id)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current.and_then(|index| self.cards.get(index))
    }

    pub fn cursor(&self) -> CursorState {
        match self.current {
            _ if self.cards.is_empty() => CursorState::Empty,
            None => CursorState::BeforeStart,
            Some(index) => CursorState::OnCard(index),
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            shown: self.current.map_or(0, |index| index + 1),
            total: self.cards.len(),
            initial: self.initial_size,
        }
    }

    /// Shows the next card. Past the last card the discard pile and the
    /// last card are shuffled into a fresh deck and the cursor returns to
    /// the start.
    pub fn advance<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<Advance, CursorError> {
        match self.cursor() {
            CursorState::Empty => Err(CursorError::EmptyDeck),
            CursorState::BeforeStart => {
                self.current = Some(0);
                Ok(Advance::Moved(0))
            }
            CursorState::OnCard(index) if index + 1 < self.cards.len() => {
                self.discard.push(self.cards[index].clone());
                self.current = Some(index + 1);
                Ok(Advance::Moved(index + 1))
            }
            CursorState::OnCard(index) => {
                if self.discard.is_empty() {
                    return Err(CursorError::NoMoreCards);
                }
                let mut fresh = std::mem::take(&mut self.discard);
                fresh.push(self.cards[index].clone());
                shuffle(&mut fresh, rng);
                self.cards = fresh;
                self.current = None;
                log::debug!("reshuffled {} cards from the discard pile", self.cards.len());
                Ok(Advance::Reshuffled)
            }
        }
    }

    /// Steps back one card. Returns `false` when already before the start.
    pub fn retreat(&mut self) -> bool {
        match self.cursor() {
            CursorState::Empty | CursorState::BeforeStart => false,
            CursorState::OnCard(index) => {
                self.step_back(index);
                true
            }
        }
    }

    /// Returns to the start without touching the deck order.
    pub fn clear(&mut self) {
        self.current = None;
        self.discard.clear();
    }

    pub(crate) fn step_back(&mut self, index: usize) {
        if index == 0 {
            self.current = None;
        } else {
            self.discard.pop();
            self.current = Some(index - 1);
        }
    }
}
