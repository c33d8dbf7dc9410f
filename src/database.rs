//! In-memory sequence database model
//!
//! A database is an ordered list of sequences; a sequence is an ordered list
//! of itemsets; an itemset is a strictly ascending list of positive integer
//! items. Sequence IDs are the 0-based position in the loaded list and are
//! the identity used by supports and projection. The database is immutable
//! once loaded.

use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Integer item identifier. Items are positive; 0 is rejected at validation.
pub type Item = u32;

/// Errors raised when a database violates the input contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("sequence {sequence}: itemset {itemset} is empty")]
    EmptyItemset { sequence: usize, itemset: usize },

    #[error("sequence {sequence}: item 0 is not a valid item (items must be positive)")]
    NonPositiveItem { sequence: usize },

    #[error("sequence {sequence}: items must be strictly ascending within an itemset (found {found} after {previous})")]
    NotAscending {
        sequence: usize,
        previous: Item,
        found: Item,
    },
}

/// A non-empty set of items, stored in strictly ascending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itemset {
    items: Vec<Item>,
}

impl Itemset {
    /// Create an itemset from items already in strictly ascending order
    pub fn new(items: Vec<Item>) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self { items }
    }

    /// Single-item itemset
    pub fn single(item: Item) -> Self {
        Self { items: vec![item] }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item at position `j` (positions follow the ascending order)
    pub fn item_at(&self, j: usize) -> Item {
        self.items[j]
    }

    /// Position of `item` in this itemset, if present
    pub fn index_of(&self, item: Item) -> Option<usize> {
        self.items.binary_search(&item).ok()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.index_of(item).is_some()
    }

    /// True if every item of `other` is present in this itemset
    pub fn contains_all(&self, other: &[Item]) -> bool {
        other.iter().all(|&item| self.contains(item))
    }

    /// Append an item known to be greater than every current member
    pub fn push(&mut self, item: Item) {
        debug_assert!(self.items.last().map_or(true, |&last| last < item));
        self.items.push(item);
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in &self.items {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{item}")?;
            first = false;
        }
        Ok(())
    }
}

/// An ordered list of itemsets with its position in the database as ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    id: usize,
    itemsets: Vec<Itemset>,
}

impl Sequence {
    pub fn new(id: usize, itemsets: Vec<Itemset>) -> Self {
        Self { id, itemsets }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    pub fn itemsets(&self) -> &[Itemset] {
        &self.itemsets
    }

    pub fn itemset(&self, i: usize) -> &Itemset {
        &self.itemsets[i]
    }

    /// Copy of this sequence with every item rejected by `keep` removed;
    /// itemsets left empty by the removal are dropped, the ID is preserved
    pub fn retain_items(&self, keep: impl Fn(Item) -> bool) -> Sequence {
        let itemsets = self
            .itemsets
            .iter()
            .map(|itemset| {
                Itemset::new(
                    itemset
                        .items()
                        .iter()
                        .copied()
                        .filter(|&item| keep(item))
                        .collect(),
                )
            })
            .filter(|itemset| !itemset.is_empty())
            .collect();
        Sequence {
            id: self.id,
            itemsets,
        }
    }
}

/// An immutable, ordered collection of sequences
#[derive(Debug, Clone, Default)]
pub struct SequenceDatabase {
    sequences: Vec<Sequence>,
}

impl SequenceDatabase {
    /// Build a database from raw itemsets, assigning dense 0-based IDs
    pub fn from_itemsets(raw: Vec<Vec<Vec<Item>>>) -> Self {
        let sequences = raw
            .into_iter()
            .enumerate()
            .map(|(id, itemsets)| {
                Sequence::new(id, itemsets.into_iter().map(Itemset::new).collect())
            })
            .collect();
        Self { sequences }
    }

    /// Wrap sequences that already carry dense 0-based IDs
    pub fn from_sequences(sequences: Vec<Sequence>) -> Self {
        debug_assert!(sequences.iter().enumerate().all(|(i, s)| s.id() == i));
        Self { sequences }
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Check the input contract: positive items, strictly ascending within
    /// each itemset, no empty itemsets
    pub fn validate(&self) -> Result<(), DatabaseError> {
        for sequence in &self.sequences {
            for (i, itemset) in sequence.itemsets().iter().enumerate() {
                if itemset.is_empty() {
                    return Err(DatabaseError::EmptyItemset {
                        sequence: sequence.id(),
                        itemset: i,
                    });
                }
                let mut previous: Option<Item> = None;
                for &item in itemset.items() {
                    if item == 0 {
                        return Err(DatabaseError::NonPositiveItem {
                            sequence: sequence.id(),
                        });
                    }
                    if let Some(prev) = previous {
                        if item <= prev {
                            return Err(DatabaseError::NotAscending {
                                sequence: sequence.id(),
                                previous: prev,
                                found: item,
                            });
                        }
                    }
                    previous = Some(item);
                }
            }
        }
        Ok(())
    }

    /// Map each item to the set of sequence IDs containing it
    pub fn sequences_containing_items(&self) -> HashMap<Item, HashSet<usize>> {
        let mut map: HashMap<Item, HashSet<usize>> = HashMap::new();
        for sequence in &self.sequences {
            for itemset in sequence.itemsets() {
                for &item in itemset.items() {
                    map.entry(item).or_default().insert(sequence.id());
                }
            }
        }
        map
    }
}
