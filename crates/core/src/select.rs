use crate::{shuffle, Card, CardId, CountTable, RandomSource, TypeCache, TypeExpression};
use std::collections::HashSet;

/// Picks up to `count` cards carrying `target` from `pool`.
///
/// A card is accepted when every AND-group of its type expression has an
/// option that is either `target` or still has a positive remaining count.
/// Accepting a card takes one count per group, so a single card can fill
/// several requested types at once.
pub fn select_by_type<R: RandomSource + ?Sized>(
    target: &str,
    count: u32,
    pool: &[&Card],
    selected: &mut HashSet<CardId>,
    counts: &mut CountTable,
    types: &mut TypeCache,
    rng: &mut R,
) -> Vec<Card> {
    let mut picked = Vec::new();
    if count == 0 {
        return picked;
    }

    let mut candidates: Vec<&Card> = pool
        .iter()
        .copied()
        .filter(|card| types.parse(&card.kind).has_type(target))
        .collect();
    shuffle(&mut candidates, rng);

    for card in candidates {
        if picked.len() >= count as usize {
            break;
        }
        if selected.contains(&card.id) {
            continue;
        }
        let expr = types.parse(&card.kind);
        let Some(claims) = plan_claims(&expr, target, counts) else {
            continue;
        };
        for name in claims {
            if let Some(remaining) = counts.get_mut(name) {
                *remaining = remaining.saturating_sub(1);
            }
        }
        selected.insert(card.id);
        picked.push(card.clone());
    }
    picked
}

/// Chooses which count each AND-group draws from, or `None` if any group
/// cannot be satisfied. Nothing is committed here.
fn plan_claims<'e>(
    expr: &'e TypeExpression,
    target: &str,
    counts: &CountTable,
) -> Option<Vec<&'e str>> {
    let open = |name: &str| counts.get(name).is_some_and(|remaining| *remaining > 0);
    expr.and_groups
        .iter()
        .map(|group| {
            group
                .iter()
                .find(|option| option.as_str() != target && open(option.as_str()))
                .or_else(|| group.iter().find(|option| option.as_str() == target))
                .map(String::as_str)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRng;

    fn counts(entries: &[(&str, u32)]) -> CountTable {
        entries
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    fn run(
        target: &str,
        count: u32,
        cards: &[Card],
        selected: &mut HashSet<CardId>,
        table: &mut CountTable,
    ) -> Vec<Card> {
        let pool: Vec<&Card> = cards.iter().collect();
        let mut types = TypeCache::new();
        let mut rng = ScriptedRng::default();
        select_by_type(target, count, &pool, selected, table, &mut types, &mut rng)
    }

    #[test]
    fn zero_count_selects_nothing() {
        let cards = vec![Card::new(1, "a", "A")];
        let mut table = counts(&[("A", 0)]);
        assert!(run("A", 0, &cards, &mut HashSet::new(), &mut table).is_empty());
    }

    #[test]
    fn stops_at_requested_count_and_decrements_target() {
        let cards: Vec<Card> = (1..=4).map(|id| Card::new(id, "a", "A")).collect();
        let mut table = counts(&[("A", 2)]);
        let mut selected = HashSet::new();
        let picked = run("A", 2, &cards, &mut selected, &mut table);
        assert_eq!(picked.len(), 2);
        assert_eq!(selected.len(), 2);
        assert_eq!(table["A"], 0);
    }

    #[test]
    fn skips_cards_already_selected() {
        let cards = vec![Card::new(1, "a", "A"), Card::new(2, "b", "A")];
        let mut selected = HashSet::from([1]);
        let mut table = counts(&[("A", 2)]);
        let picked = run("A", 2, &cards, &mut selected, &mut table);
        assert_eq!(picked.iter().map(|card| card.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn and_group_without_budget_rejects_card() {
        let cards = vec![Card::new(1, "ab", "A+B"), Card::new(2, "a", "A")];
        let mut table = counts(&[("A", 2), ("B", 0)]);
        let picked = run("A", 2, &cards, &mut HashSet::new(), &mut table);
        assert_eq!(picked.iter().map(|card| card.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(table["A"], 1);
    }

    #[test]
    fn and_group_consumes_each_type_once() {
        let cards = vec![Card::new(1, "ab", "A+B")];
        let mut table = counts(&[("A", 1), ("B", 1)]);
        let picked = run("A", 1, &cards, &mut HashSet::new(), &mut table);
        assert_eq!(picked.len(), 1);
        assert_eq!(table["A"], 0);
        assert_eq!(table["B"], 0);
    }

    #[test]
    fn or_group_prefers_another_open_type() {
        let cards = vec![Card::new(1, "ab", "A/B")];
        let mut table = counts(&[("A", 1), ("B", 3)]);
        let picked = run("A", 1, &cards, &mut HashSet::new(), &mut table);
        assert_eq!(picked.len(), 1);
        assert_eq!(table["A"], 1);
        assert_eq!(table["B"], 2);
    }

    #[test]
    fn failing_later_group_commits_nothing() {
        let cards = vec![Card::new(1, "abc", "A+B+C")];
        let mut table = counts(&[("A", 1), ("B", 1), ("C", 0)]);
        let picked = run("A", 1, &cards, &mut HashSet::new(), &mut table);
        assert!(picked.is_empty());
        assert_eq!(table["A"], 1);
        assert_eq!(table["B"], 1);
    }

    #[test]
    fn cards_without_target_are_ignored() {
        let cards = vec![Card::new(1, "b", "B")];
        let mut table = counts(&[("A", 1), ("B", 1)]);
        assert!(run("A", 1, &cards, &mut HashSet::new(), &mut table).is_empty());
    }
}
