use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub type CardId = u32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    /// Display name.
    pub card: String,
    /// Raw type expression, e.g. `"Novice/Veteran+Sentry"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub contents: String,
}

impl Card {
    pub fn new(id: CardId, card: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            card: card.into(),
            kind: kind.into(),
            contents: String::new(),
        }
    }
}

/// Every card known to the app, grouped by the game it ships with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    pub games: BTreeMap<String, Vec<Card>>,
}

impl Catalog {
    pub fn game_names(&self) -> impl Iterator<Item = &str> {
        self.games.keys().map(String::as_str)
    }

    pub fn game(&self, name: &str) -> Option<&[Card]> {
        self.games.get(name).map(Vec::as_slice)
    }
}

/// Cards available for the currently selected games.
#[derive(Debug, Clone, Default)]
pub struct CardPool {
    cards: Vec<Card>,
}

impl CardPool {
    /// Unions the selected games in selection order. A card listed under
    /// several games is kept once, at its first occurrence.
    pub fn from_catalog(catalog: &Catalog, games: &[String]) -> Self {
        let mut cards = Vec::new();
        for name in games {
            match catalog.game(name) {
                Some(game) => cards.extend(game.iter().cloned()),
                None => log::warn!("ignoring unknown game {name:?}"),
            }
        }
        Self::from_cards(cards)
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut seen = HashSet::new();
        let cards = cards
            .into_iter()
            .filter(|card| seen.insert(card.id))
            .collect();
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Case-insensitive substring match on name or type string.
    pub fn search(&self, query: &str) -> Vec<&Card> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.cards
            .iter()
            .filter(|card| {
                card.card.to_lowercase().contains(&needle)
                    || card.kind.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
