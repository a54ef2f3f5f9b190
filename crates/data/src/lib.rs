//! Data loading and validation for the card catalog.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
