use std::{collections::BTreeMap, fmt};

use crate::core::Side;

/// Key-value store for the win counters.
///
/// Missing keys read as zero. Implementations that persist to disk handle their own
/// failures, so a broken store never interrupts a game.
pub trait ScoreStore: fmt::Debug {
    fn get(&self, key: &str) -> u32;
    fn set(&mut self, key: &str, value: u32);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryScoreStore {
    scores: BTreeMap<String, u32>,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self, key: &str) -> u32 {
        self.scores.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.scores.insert(key.to_owned(), value);
    }
}

#[must_use]
pub fn wins(store: &dyn ScoreStore, side: Side) -> u32 {
    store.get(side.score_key())
}

/// Adds one win for `side` and returns the new total.
pub fn record_win(store: &mut dyn ScoreStore, side: Side) -> u32 {
    let total = wins(store, side).saturating_add(1);
    store.set(side.score_key(), total);
    total
}
