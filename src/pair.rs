//! Candidate-extension pairs
//!
//! A pair identifies a one-item extension in its structural context: the
//! item, whether the enclosing itemset was cut at right (`is_prefix`) and
//! whether it was a postfix remainder (`is_postfix`). Equality and hashing
//! cover only that key; the supporting sequence IDs accumulate in a set per
//! key while scanning, so a base sequence counts at most once per pair.

use crate::database::Item;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub item: Item,
    pub is_prefix: bool,
    pub is_postfix: bool,
}

/// Pairs keyed by structural context, each with its support set
#[derive(Debug, Default)]
pub struct PairMap {
    pairs: HashMap<PairKey, HashSet<usize>>,
}

impl PairMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sequence_id` as supporting `key`
    pub fn record(&mut self, key: PairKey, sequence_id: usize) {
        self.pairs.entry(key).or_default().insert(sequence_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &HashSet<usize>)> {
        self.pairs.iter()
    }

    /// True if any pair is supported by exactly `support` sequences
    pub fn any_with_support(&self, support: usize) -> bool {
        self.pairs.values().any(|ids| ids.len() == support)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
