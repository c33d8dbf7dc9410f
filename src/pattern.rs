//! Sequential patterns and the in-memory pattern collector
//!
//! A sequential pattern is an ordered list of itemsets plus the set of base
//! sequence IDs that contain it (the support set). During recursion the
//! in-progress prefix is extended by copy: either a new one-item itemset is
//! appended (S-extension) or the item joins the last itemset (I-extension).

use crate::database::{Item, Itemset, Sequence};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialPattern {
    itemsets: Vec<Itemset>,
    sequence_ids: HashSet<usize>,
}

impl SequentialPattern {
    /// One-itemset pattern over a single item
    pub fn singleton(item: Item, sequence_ids: HashSet<usize>) -> Self {
        Self {
            itemsets: vec![Itemset::single(item)],
            sequence_ids,
        }
    }

    pub fn itemsets(&self) -> &[Itemset] {
        &self.itemsets
    }

    /// Number of itemsets
    pub fn size(&self) -> usize {
        self.itemsets.len()
    }

    /// Total number of item occurrences across all itemsets
    pub fn item_occurrence_count(&self) -> usize {
        self.itemsets.iter().map(Itemset::len).sum()
    }

    /// The i-th item occurrence, counting across itemset boundaries
    pub fn ith_item(&self, mut i: usize) -> Item {
        for itemset in &self.itemsets {
            if i < itemset.len() {
                return itemset.item_at(i);
            }
            i -= itemset.len();
        }
        panic!("item occurrence index out of range");
    }

    pub fn sequence_ids(&self) -> &HashSet<usize> {
        &self.sequence_ids
    }

    pub fn set_sequence_ids(&mut self, sequence_ids: HashSet<usize>) {
        self.sequence_ids = sequence_ids;
    }

    /// Cardinality of the support set
    pub fn absolute_support(&self) -> usize {
        self.sequence_ids.len()
    }

    /// Copy of this pattern with `item` appended as a new one-item itemset
    pub fn extended_with_new_itemset(&self, item: Item) -> Self {
        let mut itemsets = self.itemsets.clone();
        itemsets.push(Itemset::single(item));
        Self {
            itemsets,
            sequence_ids: HashSet::new(),
        }
    }

    /// Copy of this pattern with `item` appended to the last itemset
    pub fn extended_in_last_itemset(&self, item: Item) -> Self {
        let mut itemsets = self.itemsets.clone();
        itemsets
            .last_mut()
            .expect("prefix patterns are never empty")
            .push(item);
        Self {
            itemsets,
            sequence_ids: HashSet::new(),
        }
    }

    /// True if this pattern occurs in `sequence`: each pattern itemset is a
    /// subset of some sequence itemset, in order, at distinct positions
    pub fn is_contained_in(&self, sequence: &Sequence) -> bool {
        let mut next = 0;
        for itemset in &self.itemsets {
            let found = (next..sequence.len())
                .find(|&i| sequence.itemset(i).contains_all(itemset.items()));
            match found {
                Some(i) => next = i + 1,
                None => return false,
            }
        }
        true
    }
}

impl fmt::Display for SequentialPattern {
    /// Renders the standard line format: `1 2 -1 5 -1  #SUP: 4`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for itemset in &self.itemsets {
            write!(f, "{itemset} -1 ")?;
        }
        write!(f, " #SUP: {}", self.absolute_support())
    }
}

/// Closed patterns collected in memory, bucketed by itemset count
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    levels: Vec<Vec<SequentialPattern>>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pattern: SequentialPattern) {
        let level = pattern.size();
        while self.levels.len() <= level {
            self.levels.push(Vec::new());
        }
        self.levels[level].push(pattern);
    }

    /// Patterns with exactly `length` itemsets
    pub fn level(&self, length: usize) -> &[SequentialPattern] {
        self.levels.get(length).map_or(&[], Vec::as_slice)
    }

    /// Number of itemsets in the longest collected pattern
    pub fn max_length(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SequentialPattern> {
        self.levels.iter().flatten()
    }

    pub fn pattern_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}
