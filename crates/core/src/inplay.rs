use crate::{Card, CardId};
use serde::{Deserialize, Serialize};

/// Cards the player has flagged as active outside the deck.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct InPlay {
    cards: Vec<Card>,
}

impl InPlay {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut in_play = Self::default();
        for card in cards {
            in_play.add(card);
        }
        in_play
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    /// Returns `false` if a card with the same id is already listed.
    pub fn add(&mut self, card: Card) -> bool {
        if self.contains(card.id) {
            return false;
        }
        self.cards.push(card);
        true
    }

    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.id == id)?;
        Some(self.cards.remove(index))
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}
