use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Remaining desired count per type name.
pub type CountTable = BTreeMap<String, u32>;

pub const NOVICE_TYPE: &str = "Novice";
pub const VETERAN_TYPE: &str = "Veteran";
pub const DEFAULT_SPECIAL_REPLACEMENT_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Regular,
    Reserve,
    Special,
}

/// Which types get special treatment during composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleSet {
    pub held_back_types: BTreeSet<String>,
    pub reserve_types: BTreeSet<String>,
    pub special_types: BTreeSet<String>,
    pub special_replacement_threshold: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            held_back_types: BTreeSet::new(),
            reserve_types: BTreeSet::from(["Sentry".to_string()]),
            special_types: BTreeSet::from(["Corrupter".to_string()]),
            special_replacement_threshold: DEFAULT_SPECIAL_REPLACEMENT_THRESHOLD,
        }
    }
}

impl RuleSet {
    pub fn category(&self, name: &str) -> TypeCategory {
        if self.reserve_types.contains(name) {
            TypeCategory::Reserve
        } else if self.special_types.contains(name) {
            TypeCategory::Special
        } else {
            TypeCategory::Regular
        }
    }

    pub fn compose_options(&self, enable_reserve: bool, enable_special: bool) -> ComposeOptions {
        ComposeOptions {
            enable_reserve_rules: enable_reserve,
            enable_special_rules: enable_special,
            special_replacement_threshold: self.special_replacement_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComposeOptions {
    pub enable_reserve_rules: bool,
    pub enable_special_rules: bool,
    pub special_replacement_threshold: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            enable_reserve_rules: false,
            enable_special_rules: false,
            special_replacement_threshold: DEFAULT_SPECIAL_REPLACEMENT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Difficulty {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub novice: u32,
    pub veteran: u32,
}

impl Difficulty {
    pub fn apply_to(&self, counts: &mut CountTable) {
        counts.insert(NOVICE_TYPE.to_string(), self.novice);
        counts.insert(VETERAN_TYPE.to_string(), self.veteran);
    }
}
