use crate::{
    select_by_type, shuffle, Card, CardId, CardPool, ComposeOptions, CountTable, RandomSource,
    RuleSet, TypeCache, TypeCategory,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("no games selected")]
    NoGamesSelected,
    #[error("every card count is zero")]
    NoCountsRequested,
    #[error("no cards match the requested counts")]
    NothingSelected,
}

/// A requested type that produced fewer cards than asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub card_type: String,
    pub requested: u32,
    pub selected: u32,
}

#[derive(Debug, Clone)]
pub struct Composition {
    pub active: Vec<Card>,
    pub reserve: Vec<Card>,
    pub held_back: Vec<Card>,
    pub selected: HashSet<CardId>,
    pub shortfalls: Vec<Shortfall>,
}

struct Pass<'a, 'p, R: ?Sized> {
    remaining: CountTable,
    selected: HashSet<CardId>,
    shortfalls: Vec<Shortfall>,
    types: &'a mut TypeCache,
    rng: &'a mut R,
    pool: &'a [&'p Card],
}

impl<'a, 'p, R: RandomSource + ?Sized> Pass<'a, 'p, R> {
    fn select_category(
        &mut self,
        rules: &RuleSet,
        category: TypeCategory,
        candidates: &[&'p Card],
    ) -> Vec<Card> {
        let names: Vec<String> = self
            .remaining
            .keys()
            .filter(|name| rules.category(name) == category)
            .cloned()
            .collect();
        let mut picked = Vec::new();
        for name in names {
            let want = self.remaining.get(&name).copied().unwrap_or(0);
            if want == 0 {
                continue;
            }
            let cards = select_by_type(
                &name,
                want,
                candidates,
                &mut self.selected,
                &mut self.remaining,
                &mut *self.types,
                &mut *self.rng,
            );
            if cards.len() < want as usize {
                log::warn!(
                    "only {} of {} requested {name} cards could be selected",
                    cards.len(),
                    want
                );
                self.shortfalls.push(Shortfall {
                    card_type: name.clone(),
                    requested: want,
                    selected: cards.len() as u32,
                });
            }
            picked.extend(cards);
        }
        picked
    }
}

/// Builds a fresh active deck from `pool`.
///
/// Held-back cards never enter selection. Reserve cards are returned
/// separately and stay out of the active deck until introduced.
pub fn compose<R: RandomSource + ?Sized>(
    pool: &CardPool,
    counts: &CountTable,
    rules: &RuleSet,
    options: &ComposeOptions,
    types: &mut TypeCache,
    rng: &mut R,
) -> Result<Composition, ComposeError> {
    if pool.is_empty() {
        return Err(ComposeError::NoGamesSelected);
    }
    if counts.values().all(|count| *count == 0) {
        return Err(ComposeError::NoCountsRequested);
    }

    let mut eligible: Vec<&Card> = Vec::new();
    let mut held_back = Vec::new();
    for card in pool.cards() {
        if types.parse(&card.kind).has_any(rules.held_back_types.iter()) {
            held_back.push(card.clone());
        } else {
            eligible.push(card);
        }
    }

    let regular: Vec<&Card> = eligible
        .iter()
        .copied()
        .filter(|card| {
            let expr = types.parse(&card.kind);
            !(options.enable_reserve_rules && expr.has_any(rules.reserve_types.iter()))
                && !(options.enable_special_rules && expr.has_any(rules.special_types.iter()))
        })
        .collect();

    let mut pass = Pass {
        remaining: counts.clone(),
        selected: HashSet::new(),
        shortfalls: Vec::new(),
        types,
        rng,
        pool: &eligible,
    };

    let mut main = pass.select_category(rules, TypeCategory::Regular, &regular);
    let special = if options.enable_special_rules {
        let candidates = pass.pool;
        pass.select_category(rules, TypeCategory::Special, candidates)
    } else {
        Vec::new()
    };
    let reserve = if options.enable_reserve_rules {
        let candidates = pass.pool;
        pass.select_category(rules, TypeCategory::Reserve, candidates)
    } else {
        Vec::new()
    };

    if main.is_empty() && special.is_empty() && reserve.is_empty() {
        return Err(ComposeError::NothingSelected);
    }

    let threshold = options.special_replacement_threshold;
    if options.enable_special_rules && threshold > 0 && main.len() >= threshold {
        for card in main.drain(..threshold) {
            pass.selected.remove(&card.id);
        }
        let mut replacements: Vec<&Card> = Vec::new();
        for card in pass.pool.iter().copied() {
            if !pass.selected.contains(&card.id)
                && pass.types.parse(&card.kind).has_any(rules.special_types.iter())
            {
                replacements.push(card);
            }
        }
        shuffle(&mut replacements, &mut *pass.rng);
        for card in replacements.into_iter().take(threshold) {
            pass.selected.insert(card.id);
            main.push(card.clone());
        }
        log::debug!("swapped {threshold} regular cards for special cards");
    }

    shuffle(&mut main, &mut *pass.rng);
    main.extend(special);
    log::debug!(
        "composed deck of {} cards, {} in reserve, {} held back",
        main.len(),
        reserve.len(),
        held_back.len()
    );

    Ok(Composition {
        active: main,
        reserve,
        held_back,
        selected: pass.selected,
        shortfalls: pass.shortfalls,
    })
}
