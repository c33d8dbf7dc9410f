// Shared helpers for integration tests: database construction, pattern
// containment, and a brute-force closed-pattern enumerator used as a
// reference oracle on small inputs.
#![allow(dead_code)]

use cerrado::database::{Item, SequenceDatabase};
use cerrado::miner::BidePlus;
use std::collections::BTreeSet;

/// A pattern as raw itemsets, items ascending within each
pub type RawPattern = Vec<Vec<Item>>;

/// Mine `raw` in memory mode and return the result as a comparable set
pub fn mine_to_set(raw: &[RawPattern], minsup: usize) -> BTreeSet<(RawPattern, usize)> {
    let database = SequenceDatabase::from_itemsets(raw.to_vec());
    let outcome = BidePlus::new(minsup)
        .run(&database, None)
        .expect("mining failed");
    outcome
        .patterns
        .expect("memory mode returns patterns")
        .iter()
        .map(|pattern| {
            (
                pattern
                    .itemsets()
                    .iter()
                    .map(|itemset| itemset.items().to_vec())
                    .collect(),
                pattern.absolute_support(),
            )
        })
        .collect()
}

fn is_subset(small: &[Item], big: &[Item]) -> bool {
    small.iter().all(|item| big.contains(item))
}

/// True if `pattern` occurs in `sequence`: each pattern itemset matches a
/// distinct sequence itemset as a subset, in order
pub fn contained_in_sequence(pattern: &[Vec<Item>], sequence: &[Vec<Item>]) -> bool {
    let mut next = 0;
    for itemset in pattern {
        match (next..sequence.len()).find(|&i| is_subset(itemset, &sequence[i])) {
            Some(i) => next = i + 1,
            None => return false,
        }
    }
    true
}

/// True if `q` properly contains `p`
pub fn proper_super_pattern(p: &RawPattern, q: &RawPattern) -> bool {
    p != q && contained_in_sequence(p, q)
}

/// Support of `pattern` over the whole database
pub fn support_of(pattern: &RawPattern, raw: &[RawPattern]) -> usize {
    raw.iter()
        .filter(|sequence| contained_in_sequence(pattern, sequence))
        .count()
}

fn non_empty_subsets(itemset: &[Item]) -> Vec<Vec<Item>> {
    let mut subsets = Vec::new();
    for mask in 1u32..(1 << itemset.len()) {
        let subset: Vec<Item> = itemset
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, &item)| item)
            .collect();
        subsets.push(subset);
    }
    subsets
}

fn collect_subpatterns(
    sequence: &[Vec<Item>],
    idx: usize,
    current: &mut RawPattern,
    out: &mut BTreeSet<RawPattern>,
) {
    if idx == sequence.len() {
        if !current.is_empty() {
            out.insert(current.clone());
        }
        return;
    }
    collect_subpatterns(sequence, idx + 1, current, out);
    for subset in non_empty_subsets(&sequence[idx]) {
        current.push(subset);
        collect_subpatterns(sequence, idx + 1, current, out);
        current.pop();
    }
}

/// Every closed frequent pattern of `raw`, by exhaustive enumeration.
/// Exponential; only for small reference inputs.
pub fn brute_force_closed(raw: &[RawPattern], minsup: usize) -> BTreeSet<(RawPattern, usize)> {
    let mut candidates: BTreeSet<RawPattern> = BTreeSet::new();
    for sequence in raw {
        let mut current = Vec::new();
        collect_subpatterns(sequence, 0, &mut current, &mut candidates);
    }

    let frequent: Vec<(RawPattern, usize)> = candidates
        .into_iter()
        .map(|pattern| {
            let support = support_of(&pattern, raw);
            (pattern, support)
        })
        .filter(|(_, support)| *support >= minsup)
        .collect();

    frequent
        .iter()
        .filter(|(pattern, support)| {
            !frequent.iter().any(|(other, other_support)| {
                other_support == support && proper_super_pattern(pattern, other)
            })
        })
        .cloned()
        .collect()
}
