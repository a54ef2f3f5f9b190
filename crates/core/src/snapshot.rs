//! The persisted session record. Field names match the saved JSON.

use crate::{Card, CardId, CountTable, Deck, InPlay};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("saved index {index} is outside a deck of {len} cards")]
    CursorOutOfRange { index: i64, len: usize },
    #[error("saved discard pile has {found} cards, expected {expected}")]
    DiscardMismatch { found: usize, expected: usize },
    #[error("saved discard pile differs from the deck at position {position}")]
    DiscardOutOfOrder { position: usize },
    #[error("card {0} appears more than once in the saved deck")]
    DuplicateCard(CardId),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub selected_games: Vec<String>,
    #[serde(default)]
    pub card_counts: CountTable,
    #[serde(default)]
    pub special_card_counts: CountTable,
    #[serde(default)]
    pub enable_reserve_rules: bool,
    #[serde(default)]
    pub enable_special_rules: bool,
    #[serde(default)]
    pub selected_difficulty_index: usize,
}

impl Settings {
    /// Regular and special counts merged for one composition pass.
    pub fn requested_counts(&self) -> CountTable {
        let mut counts = self.card_counts.clone();
        counts.extend(
            self.special_card_counts
                .iter()
                .map(|(name, count)| (name.clone(), *count)),
        );
        counts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeckSnapshot {
    pub current_deck: Vec<Card>,
    /// `-1` before the first card.
    pub current_index: i64,
    pub discard_pile: Vec<Card>,
    pub reserve_deck: Vec<Card>,
    pub initial_deck_size: usize,
    #[serde(default)]
    pub in_play_cards: Vec<Card>,
}

impl Default for DeckSnapshot {
    fn default() -> Self {
        Self {
            current_deck: Vec::new(),
            current_index: -1,
            discard_pile: Vec::new(),
            reserve_deck: Vec::new(),
            initial_deck_size: 0,
            in_play_cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(flatten)]
    pub settings: Settings,
    #[serde(default)]
    pub deck_state: DeckSnapshot,
}

impl SessionSnapshot {
    pub fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

impl Deck {
    pub fn to_snapshot(&self, in_play: &InPlay) -> DeckSnapshot {
        DeckSnapshot {
            current_deck: self.cards.clone(),
            current_index: self.current.map_or(-1, |index| index as i64),
            discard_pile: self.discard.clone(),
            reserve_deck: self.reserve.clone(),
            initial_deck_size: self.initial_size,
            in_play_cards: in_play.cards().to_vec(),
        }
    }

    /// Rebuilds a deck, deriving the selected set from every card it holds.
    pub fn from_snapshot(snapshot: &DeckSnapshot) -> Result<Self, SnapshotError> {
        let len = snapshot.current_deck.len();
        let current = match snapshot.current_index {
            -1 => None,
            index if index >= 0 && (index as usize) < len => Some(index as usize),
            index => return Err(SnapshotError::CursorOutOfRange { index, len }),
        };
        let expected = current.unwrap_or(0);
        if snapshot.discard_pile.len() != expected {
            return Err(SnapshotError::DiscardMismatch {
                found: snapshot.discard_pile.len(),
                expected,
            });
        }
        if let Some(position) = snapshot
            .discard_pile
            .iter()
            .zip(&snapshot.current_deck)
            .position(|(discarded, card)| discarded.id != card.id)
        {
            return Err(SnapshotError::DiscardOutOfOrder { position });
        }
        let mut selected = HashSet::new();
        for card in snapshot.current_deck.iter().chain(&snapshot.reserve_deck) {
            if !selected.insert(card.id) {
                return Err(SnapshotError::DuplicateCard(card.id));
            }
        }
        Ok(Self {
            cards: snapshot.current_deck.clone(),
            current,
            discard: snapshot.discard_pile.clone(),
            reserve: snapshot.reserve_deck.clone(),
            selected,
            initial_size: snapshot.initial_deck_size,
        })
    }
}
