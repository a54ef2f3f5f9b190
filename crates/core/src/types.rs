//! Card type expressions.
//!
//! A type string joins AND-groups with `+` and the options inside a group
//! with `/`, so `"Novice/Veteran+Sentry"` reads as
//! "(Novice or Veteran) and Sentry".

use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeExpression {
    pub and_groups: Vec<Vec<String>>,
    pub all_types: BTreeSet<String>,
}

impl TypeExpression {
    pub fn parse(raw: &str) -> Self {
        let mut and_groups = Vec::new();
        let mut all_types = BTreeSet::new();
        for segment in raw.split('+') {
            let group: Vec<String> = segment
                .split('/')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
            if group.is_empty() {
                continue;
            }
            all_types.extend(group.iter().cloned());
            and_groups.push(group);
        }
        Self {
            and_groups,
            all_types,
        }
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.all_types.contains(name)
    }

    pub fn has_any<'a>(&self, mut names: impl Iterator<Item = &'a String>) -> bool {
        names.any(|name| self.all_types.contains(name))
    }

    pub fn shares_type_with(&self, other: &TypeExpression) -> bool {
        self.has_any(other.all_types.iter())
    }
}

/// Memoized parser, keyed by the exact type string.
///
/// Owned by the session and cleared whenever the game selection changes.
#[derive(Debug, Default)]
pub struct TypeCache {
    entries: HashMap<String, Rc<TypeExpression>>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, raw: &str) -> Rc<TypeExpression> {
        if let Some(expr) = self.entries.get(raw) {
            return Rc::clone(expr);
        }
        let expr = Rc::new(TypeExpression::parse(raw));
        self.entries.insert(raw.to_string(), Rc::clone(&expr));
        expr
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
