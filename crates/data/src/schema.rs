pub use eventdeck_core::{Card, CardId, Catalog, Difficulty, RuleSet};

/// Everything the app needs loaded before a session can start.
#[derive(Debug, Clone)]
pub struct Assets {
    pub catalog: Catalog,
    pub difficulties: Vec<Difficulty>,
    pub rules: RuleSet,
}
