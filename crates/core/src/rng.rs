use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform random choices used by every shuffle and random pick.
pub trait RandomSource {
    /// Returns an index uniformly drawn from `0..bound`. `bound` is never zero.
    fn index(&mut self, bound: usize) -> usize;
}

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for RngState {
    fn index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// Replays queued indices, reduced modulo the requested bound. Once the
/// queue runs dry every draw is `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    queue: VecDeque<usize>,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = usize>) -> Self {
        Self {
            queue: values.into_iter().collect(),
        }
    }

    pub fn push(&mut self, value: usize) {
        self.queue.push_back(value);
    }
}

impl RandomSource for ScriptedRng {
    fn index(&mut self, bound: usize) -> usize {
        self.queue.pop_front().map_or(0, |value| value % bound)
    }
}

/// Fisher–Yates, in place: walks from the last index down to 1 and swaps
/// each slot with one drawn from `0..=i`.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

pub fn pick<'a, T, R: RandomSource + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.index(items.len()))
}
