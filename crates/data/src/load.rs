use crate::schema::{Assets, CardId, Catalog, Difficulty, RuleSet};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const CARDS_FILE: &str = "cards.json";
pub const DIFFICULTY_FILE: &str = "difficulty.json";
pub const RULES_FILE: &str = "rules.json";

pub fn load_assets(dir: &Path) -> anyhow::Result<Assets> {
    let catalog = load_catalog(&dir.join(CARDS_FILE))?;
    let difficulties = load_difficulties(&dir.join(DIFFICULTY_FILE))?;
    let rules = load_rules(&dir.join(RULES_FILE))?;
    log::info!(
        "loaded {} games and {} difficulty levels from {}",
        catalog.games.len(),
        difficulties.len(),
        dir.display()
    );
    Ok(Assets {
        catalog,
        difficulties,
        rules,
    })
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let catalog: Catalog = load_json(path)?;
    validate_catalog(&catalog).with_context(|| format!("validate {}", path.display()))?;
    Ok(catalog)
}

pub fn load_difficulties(path: &Path) -> anyhow::Result<Vec<Difficulty>> {
    let difficulties: Vec<Difficulty> = load_json(path)?;
    if difficulties.is_empty() {
        bail!("{} lists no difficulty levels", path.display());
    }
    Ok(difficulties)
}

/// A missing rules file means the default rules.
pub fn load_rules(path: &Path) -> anyhow::Result<RuleSet> {
    if !path.exists() {
        return Ok(RuleSet::default());
    }
    load_json(path)
}

/// Cards may appear under several games, but one id must always describe
/// the same card.
pub fn validate_catalog(catalog: &Catalog) -> anyhow::Result<()> {
    let mut seen: HashMap<CardId, (&str, &str)> = HashMap::new();
    for (game, cards) in &catalog.games {
        for card in cards {
            if card.kind.trim().is_empty() {
                bail!("card {} ({}) in {game} has no type", card.id, card.card);
            }
            match seen.get(&card.id) {
                Some((name, kind)) if *name != card.card || *kind != card.kind => {
                    bail!(
                        "card id {} is used for both {name:?} and {:?} (in {game})",
                        card.id,
                        card.card
                    );
                }
                Some(_) => {}
                None => {
                    seen.insert(card.id, (card.card.as_str(), card.kind.as_str()));
                }
            }
        }
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
