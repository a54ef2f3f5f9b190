//! Run-time deck changes made relative to the card on display.
//!
//! Every operation needs an active card and leaves the deck untouched when
//! it fails.

use crate::{pick, shuffle, Card, CardId, CardPool, Deck, Event, RandomSource, TypeCache};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    #[error("no card is showing")]
    NoActiveCard,
    #[error("no cards remain after the current card")]
    NothingAfterActive,
    #[error("the shuffle range must cover at least one card")]
    EmptyRange,
    #[error("the reserve deck is empty")]
    ReserveEmpty,
    #[error("no unused card shares a type with {0}")]
    NoReplacement(String),
    #[error("no unused {0} cards are left")]
    NoneAvailable(String),
    #[error("card {id} is not a {card_type} card in the selected games")]
    CardNotFound { id: CardId, card_type: String },
    #[error("{0} is already in the deck")]
    AlreadyInDeck(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Next,
    Bottom,
    Random,
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Next => "next",
            Self::Bottom => "at the bottom",
            Self::Random => "at random",
        };
        f.write_str(label)
    }
}

impl FromStr for InsertPosition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "next" => Ok(Self::Next),
            "bottom" => Ok(Self::Bottom),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown insert position {other:?}")),
        }
    }
}

impl Deck {
    fn active_index(&self) -> Result<usize, MutationError> {
        match self.current {
            Some(index) if index < self.cards.len() => Ok(index),
            _ => Err(MutationError::NoActiveCard),
        }
    }

    /// Puts the current card back anywhere from its own slot to the bottom.
    pub fn shuffle_anywhere<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Event, MutationError> {
        let index = self.active_index()?;
        let card = self.cards.remove(index);
        let slots = self.cards.len() - index + 1;
        let at = index + rng.index(slots);
        let name = card.card.clone();
        self.cards.insert(at, card);
        self.step_back(index);
        log::debug!("shuffled {name} from {index} to {at}");
        Ok(Event::CardShuffled {
            card: name,
            within: None,
        })
    }

    /// Puts the current card back in its own slot or behind one of the
    /// next `top` cards.
    pub fn shuffle_top<R: RandomSource + ?Sized>(
        &mut self,
        top: usize,
        rng: &mut R,
    ) -> Result<Event, MutationError> {
        let index = self.active_index()?;
        if top == 0 {
            return Err(MutationError::EmptyRange);
        }
        let after = self.cards.len() - index - 1;
        let span = top.min(after);
        if span == 0 {
            return Err(MutationError::NothingAfterActive);
        }
        let card = self.cards.remove(index);
        let at = index + rng.index(span + 1);
        let name = card.card.clone();
        self.cards.insert(at, card);
        self.step_back(index);
        log::debug!("shuffled {name} from {index} to {at}");
        Ok(Event::CardShuffled {
            card: name,
            within: Some(span),
        })
    }

    /// Swaps the current card for an unused card sharing one of its types.
    pub fn replace_same_type<R: RandomSource + ?Sized>(
        &mut self,
        pool: &CardPool,
        types: &mut TypeCache,
        rng: &mut R,
    ) -> Result<Event, MutationError> {
        let index = self.active_index()?;
        let current_id = self.cards[index].id;
        let expr = types.parse(&self.cards[index].kind);
        let options: Vec<&Card> = pool
            .cards()
            .iter()
            .filter(|card| card.id != current_id && !self.selected.contains(&card.id))
            .filter(|card| types.parse(&card.kind).shares_type_with(&expr))
            .collect();
        let replacement = match pick(&options, rng) {
            Some(card) => (*card).clone(),
            None => return Err(MutationError::NoReplacement(self.cards[index].card.clone())),
        };
        self.selected.remove(&current_id);
        self.selected.insert(replacement.id);
        let new = replacement.card.clone();
        let old = std::mem::replace(&mut self.cards[index], replacement);
        Ok(Event::CardReplaced { old: old.card, new })
    }

    /// Shuffles the reserve deck into the cards not yet shown.
    pub fn introduce_reserve<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Event, MutationError> {
        let index = self.active_index()?;
        if self.reserve.is_empty() {
            return Err(MutationError::ReserveEmpty);
        }
        let count = self.reserve.len();
        let mut future = self.cards.split_off(index + 1);
        future.append(&mut self.reserve);
        shuffle(&mut future, rng);
        self.cards.append(&mut future);
        log::debug!("introduced {count} reserve cards after position {index}");
        Ok(Event::ReserveIntroduced { count })
    }

    /// Adds an unused card of `card_type` to the deck, either the one with
    /// `specific` id or a random one.
    pub fn insert_by_type<R: RandomSource + ?Sized>(
        &mut self,
        card_type: &str,
        specific: Option<CardId>,
        position: InsertPosition,
        pool: &CardPool,
        types: &mut TypeCache,
        rng: &mut R,
    ) -> Result<Event, MutationError> {
        let index = self.active_index()?;
        let candidates: Vec<&Card> = pool
            .cards()
            .iter()
            .filter(|card| types.parse(&card.kind).has_type(card_type))
            .collect();
        let card = match specific {
            Some(id) => {
                let card = candidates.iter().find(|card| card.id == id).ok_or_else(|| {
                    MutationError::CardNotFound {
                        id,
                        card_type: card_type.to_string(),
                    }
                })?;
                if self.selected.contains(&id) {
                    return Err(MutationError::AlreadyInDeck(card.card.clone()));
                }
                (*card).clone()
            }
            None => {
                let open: Vec<&Card> = candidates
                    .into_iter()
                    .filter(|card| !self.selected.contains(&card.id))
                    .collect();
                match pick(&open, rng) {
                    Some(card) => (*card).clone(),
                    None => return Err(MutationError::NoneAvailable(card_type.to_string())),
                }
            }
        };
        let at = match position {
            InsertPosition::Next => index + 1,
            InsertPosition::Bottom => self.cards.len(),
            InsertPosition::Random => index + 1 + rng.index(self.cards.len() - index),
        };
        let name = card.card.clone();
        self.selected.insert(card.id);
        self.cards.insert(at, card);
        Ok(Event::CardInserted {
            card: name,
            position,
            index: at,
        })
    }
}
