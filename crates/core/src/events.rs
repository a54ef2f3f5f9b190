use crate::{CardId, InsertPosition, Shortfall};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    GamesSelected { games: usize, pool: usize },
    DifficultySelected { name: String },
    CountSet { card_type: String, count: u32 },
    ReserveRulesSet { enabled: bool },
    SpecialRulesSet { enabled: bool },
    DeckComposed {
        size: usize,
        reserve: usize,
        held_back: usize,
        shortfalls: Vec<Shortfall>,
    },
    CardShown { index: usize, total: usize },
    DeckReshuffled { size: usize },
    Retreated { index: Option<usize> },
    DeckCleared,
    CardShuffled { card: String, within: Option<usize> },
    CardReplaced { old: String, new: String },
    ReserveIntroduced { count: usize },
    CardInserted {
        card: String,
        position: InsertPosition,
        index: usize,
    },
    InPlayAdded { id: CardId, card: String },
    InPlayRemoved { id: CardId, card: String },
    InPlayCleared,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GamesSelected { games, pool } => {
                write!(f, "{games} games selected, {pool} cards available")
            }
            Self::DifficultySelected { name } => write!(f, "Difficulty set to {name}"),
            Self::CountSet { card_type, count } => write!(f, "{card_type} count set to {count}"),
            Self::ReserveRulesSet { enabled } => write!(f, "Reserve rules {}", on_off(*enabled)),
            Self::SpecialRulesSet { enabled } => write!(f, "Special rules {}", on_off(*enabled)),
            Self::DeckComposed {
                size,
                reserve,
                held_back,
                shortfalls,
            } => {
                write!(f, "Deck built with {size} cards")?;
                if *reserve > 0 {
                    write!(f, ", {reserve} in reserve")?;
                }
                if *held_back > 0 {
                    write!(f, ", {held_back} held back")?;
                }
                for (position, short) in shortfalls.iter().enumerate() {
                    let lead = if position == 0 { "; short of" } else { "," };
                    write!(
                        f,
                        "{lead} {} ({} of {})",
                        short.card_type, short.selected, short.requested
                    )?;
                }
                Ok(())
            }
            Self::CardShown { index, total } => write!(f, "Card {} of {total}", index + 1),
            Self::DeckReshuffled { size } => {
                write!(f, "Discard pile reshuffled into a new deck of {size} cards")
            }
            Self::Retreated { index: Some(index) } => write!(f, "Back to card {}", index + 1),
            Self::Retreated { index: None } => write!(f, "Back to the top of the deck"),
            Self::DeckCleared => write!(f, "Deck returned to the start"),
            Self::CardShuffled { card, within: None } => {
                write!(f, "{card} shuffled back into the deck")
            }
            Self::CardShuffled {
                card,
                within: Some(top),
            } => write!(f, "{card} shuffled into the top {top} cards"),
            Self::CardReplaced { old, new } => write!(f, "{old} replaced with {new}"),
            Self::ReserveIntroduced { count } => {
                write!(f, "{count} reserve cards shuffled into the deck")
            }
            Self::CardInserted {
                card,
                position,
                index,
            } => write!(f, "{card} inserted {position} (position {})", index + 1),
            Self::InPlayAdded { card, .. } => write!(f, "{card} added to in-play cards"),
            Self::InPlayRemoved { card, .. } => write!(f, "{card} removed from in-play cards"),
            Self::InPlayCleared => write!(f, "In-play cards cleared"),
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Queue of successful changes. Draining it is the caller's cue to save
/// and refresh progress.
#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
