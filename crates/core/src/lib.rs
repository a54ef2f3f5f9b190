//! Event deck logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod compose;
pub mod config;
pub mod deck;
pub mod events;
pub mod inplay;
pub mod mutate;
pub mod rng;
pub mod select;
pub mod session;
pub mod snapshot;
pub mod types;

pub use cards::*;
pub use compose::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use inplay::*;
pub use mutate::*;
pub use rng::*;
pub use select::*;
pub use session::*;
pub use snapshot::*;
pub use types::*;
