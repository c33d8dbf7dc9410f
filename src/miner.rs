//! Closed sequential pattern mining with BIDE+
//!
//! The driver scans the database once to count per-item supports, rewrites
//! each sequence without infrequent items into an initial pseudo-database,
//! then grows every frequent singleton by pseudo-projection. BackScan
//! pruning cuts prefixes that provably cannot generate a closed pattern;
//! a prefix that survives is emitted when it has neither a forward extension
//! (no successor reaches its support) nor a backward extension (no item
//! fills one of its maximum periods in every supporting sequence).

use crate::database::{DatabaseError, Item, Sequence, SequenceDatabase};
use crate::output::PatternSink;
use crate::pair::{PairKey, PairMap};
use crate::pattern::{PatternSet, SequentialPattern};
use crate::pseudo::PseudoSequence;
use crate::stats::{self, MiningStats};
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum MineError {
    #[error("minimum support must be at least 1 sequence")]
    InvalidMinsup,

    #[error(transparent)]
    InvalidDatabase(#[from] DatabaseError),

    #[error("failed to write pattern output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a mining run
#[derive(Debug)]
pub struct MiningOutcome {
    /// Collected patterns in memory mode, `None` in file mode
    pub patterns: Option<PatternSet>,
    pub stats: MiningStats,
}

/// The BIDE+ algorithm, configured with an absolute minimum support
#[derive(Debug, Clone)]
pub struct BidePlus {
    minsup: usize,
}

impl BidePlus {
    pub fn new(minsup: usize) -> Self {
        Self { minsup }
    }

    /// Mine every closed frequent sequential pattern of `database`.
    ///
    /// With an output path, patterns stream to that file as they are found;
    /// without one they are collected in memory and returned.
    pub fn run(
        &self,
        database: &SequenceDatabase,
        output_path: Option<&Path>,
    ) -> Result<MiningOutcome, MineError> {
        if self.minsup == 0 {
            return Err(MineError::InvalidMinsup);
        }
        database.validate()?;

        let started = Instant::now();
        info!(
            "mining {} sequences with minimum support {}",
            database.len(),
            self.minsup
        );

        let item_ids = database.sequences_containing_items();

        // Rewrite the database without infrequent items so no scan ever
        // touches them again; sequences left empty drop out entirely.
        let rewritten: Vec<Sequence> = database
            .sequences()
            .iter()
            .map(|sequence| {
                sequence.retain_items(|item| {
                    item_ids.get(&item).map_or(0, |ids| ids.len()) >= self.minsup
                })
            })
            .filter(|sequence| !sequence.is_empty())
            .collect();
        let initial: Vec<PseudoSequence> = rewritten
            .iter()
            .filter_map(PseudoSequence::spanning)
            .collect();

        let mut sink = match output_path {
            Some(path) => PatternSink::file(path)?,
            None => PatternSink::memory(),
        };
        let run = MiningRun {
            minsup: self.minsup,
            initial_database: &initial,
        };

        let frequent_singletons = item_ids
            .iter()
            .filter(|(_, ids)| ids.len() >= self.minsup)
            .count();
        debug!("{frequent_singletons} frequent singletons after initial scan");

        for (&item, ids) in &item_ids {
            if ids.len() < self.minsup {
                continue;
            }
            let prefix = SequentialPattern::singleton(item, ids.clone());
            // a singleton can never land inside a postfix remainder
            let projected = project(item, &initial, false);

            let successor_support = if run.back_scan_prunes(&prefix) {
                0
            } else {
                run.recurse(&prefix, &projected, &mut sink)?
            };

            if prefix.absolute_support() != successor_support
                && !run.has_backward_extension(&prefix)
            {
                sink.save(&prefix)?;
            }
        }

        let stats = MiningStats {
            elapsed: started.elapsed(),
            pattern_count: sink.pattern_count(),
            peak_memory_bytes: stats::peak_rss_bytes(),
        };
        info!(
            "found {} closed patterns in {:.3}s",
            stats.pattern_count,
            stats.elapsed.as_secs_f64()
        );
        Ok(MiningOutcome {
            patterns: sink.finish()?,
            stats,
        })
    }
}

enum PeriodKind {
    Maximum,
    SemiMaximum,
}

struct MiningRun<'a> {
    minsup: usize,
    /// Rewritten database the closure oracle draws its periods from
    initial_database: &'a [PseudoSequence<'a>],
}

impl<'a> MiningRun<'a> {
    /// Grow `prefix` with every frequent pair of `database`, emit the
    /// extensions that prove closed, and return the largest support any
    /// extension reached (the forward-extension evidence for the caller).
    fn recurse(
        &self,
        prefix: &SequentialPattern,
        database: &[PseudoSequence<'a>],
        sink: &mut PatternSink,
    ) -> Result<usize, MineError> {
        let pairs = frequent_pairs(database);
        let mut max_support = 0;

        for (key, ids) in pairs.iter() {
            if ids.len() < self.minsup {
                continue;
            }
            // postfix pairs extend the last itemset, the rest open a new one
            let mut extended = if key.is_postfix {
                prefix.extended_in_last_itemset(key.item)
            } else {
                prefix.extended_with_new_itemset(key.item)
            };
            extended.set_sequence_ids(ids.clone());
            let projected = project(key.item, database, key.is_postfix);

            let successor_support = if self.back_scan_prunes(&extended) {
                0
            } else {
                self.recurse(&extended, &projected, sink)?
            };

            if extended.absolute_support() != successor_support
                && !self.has_backward_extension(&extended)
            {
                sink.save(&extended)?;
            }
            max_support = max_support.max(extended.absolute_support());
        }
        Ok(max_support)
    }

    /// BackScan pruning: the prefix cannot generate any closed pattern when
    /// some item fills one of its semi-maximum periods in every supporting
    /// sequence.
    fn back_scan_prunes(&self, prefix: &SequentialPattern) -> bool {
        self.period_pair_reaches_support(prefix, PeriodKind::SemiMaximum)
    }

    /// A backward extension exists when some item fills one of the maximum
    /// periods in every supporting sequence; the prefix is then not closed.
    fn has_backward_extension(&self, prefix: &SequentialPattern) -> bool {
        self.period_pair_reaches_support(prefix, PeriodKind::Maximum)
    }

    fn period_pair_reaches_support(&self, prefix: &SequentialPattern, kind: PeriodKind) -> bool {
        let support = prefix.absolute_support();
        for i in 0..prefix.item_occurrence_count() {
            let mut periods = Vec::new();
            for sequence in self.initial_database {
                if !prefix.sequence_ids().contains(&sequence.id()) {
                    continue;
                }
                let period = match kind {
                    PeriodKind::Maximum => sequence.ith_maximum_period(prefix.itemsets(), i),
                    PeriodKind::SemiMaximum => {
                        sequence.ith_semi_maximum_period(prefix.itemsets(), i)
                    }
                };
                if let Some(period) = period {
                    periods.push(period);
                }
            }
            if pairs_for_backward_check(prefix, &periods, i).any_with_support(support) {
                return true;
            }
        }
        false
    }
}

/// Pseudo-projection of `database` by `item`.
///
/// An occurrence is accepted only when its postfix context matches
/// `in_suffix`, which keeps itemset extensions and sequence extensions on
/// their own branches. A mid-itemset occurrence anchors the child just past
/// the item (postfix remainder); an itemset-final occurrence anchors at the
/// next itemset. Empty children are dropped.
pub fn project<'a>(
    item: Item,
    database: &[PseudoSequence<'a>],
    in_suffix: bool,
) -> Vec<PseudoSequence<'a>> {
    let mut projected = Vec::new();
    for sequence in database {
        for i in 0..sequence.size() {
            let Some(index) = sequence.index_of(i, item) else {
                continue;
            };
            if sequence.is_postfix(i) != in_suffix {
                continue;
            }
            let child = if index + 1 < sequence.size_of_itemset_at(i) {
                sequence.advanced_to(i, index + 1)
            } else if i + 1 < sequence.size() {
                sequence.advanced_to(i + 1, 0)
            } else {
                None
            };
            if let Some(child) = child {
                projected.push(child);
            }
        }
    }
    projected
}

/// Candidate one-item extensions of the current prefix: every visible item
/// of `database` in its structural context
fn frequent_pairs(database: &[PseudoSequence<'_>]) -> PairMap {
    let mut pairs = PairMap::new();
    for sequence in database {
        for i in 0..sequence.size() {
            let is_prefix = sequence.is_cut_at_right(i);
            let is_postfix = sequence.is_postfix(i);
            for j in 0..sequence.size_of_itemset_at(i) {
                pairs.record(
                    PairKey {
                        item: sequence.item_at(j, i),
                        is_prefix,
                        is_postfix,
                    },
                    sequence.id(),
                );
            }
        }
    }
    pairs
}

/// Pairs over period pseudo-sequences for the backward checks.
///
/// Besides the normal pair for every visible item, two flipped variants are
/// emitted so an item inside a period is recognized as equivalent to an
/// in-pattern occurrence: the `is_postfix` flip once the (i-1)-th prefix
/// item was seen in the itemset, and the `is_prefix` flip when the i-th
/// prefix item occurs somewhere in the same itemset.
fn pairs_for_backward_check(
    prefix: &SequentialPattern,
    periods: &[PseudoSequence<'_>],
    i_period: usize,
) -> PairMap {
    let item_i = prefix.ith_item(i_period);
    let item_im1 = if i_period > 0 {
        Some(prefix.ith_item(i_period - 1))
    } else {
        None
    };

    let mut pairs = PairMap::new();
    for period in periods {
        for i in 0..period.size() {
            let mut saw_i = false;
            for j in 0..period.size_of_itemset_at(i) {
                let item = period.item_at(j, i);
                if item == item_i {
                    saw_i = true;
                } else if item > item_i {
                    break;
                }
            }

            let is_prefix = period.is_cut_at_right(i);
            let is_postfix = period.is_postfix(i);
            let mut saw_im1 = false;
            for j in 0..period.size_of_itemset_at(i) {
                let item = period.item_at(j, i);
                if item_im1 == Some(item) {
                    saw_im1 = true;
                }

                pairs.record(
                    PairKey {
                        item,
                        is_prefix,
                        is_postfix,
                    },
                    period.id(),
                );
                if saw_im1 {
                    pairs.record(
                        PairKey {
                            item,
                            is_prefix,
                            is_postfix: !is_postfix,
                        },
                        period.id(),
                    );
                }
                if saw_i {
                    pairs.record(
                        PairKey {
                            item,
                            is_prefix: !is_prefix,
                            is_postfix,
                        },
                        period.id(),
                    );
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine(raw: Vec<Vec<Vec<Item>>>, minsup: usize) -> Vec<(Vec<Vec<Item>>, usize)> {
        let database = SequenceDatabase::from_itemsets(raw);
        let outcome = BidePlus::new(minsup).run(&database, None).unwrap();
        let mut found: Vec<(Vec<Vec<Item>>, usize)> = outcome
            .patterns
            .unwrap()
            .iter()
            .map(|p| {
                (
                    p.itemsets().iter().map(|s| s.items().to_vec()).collect(),
                    p.absolute_support(),
                )
            })
            .collect();
        found.sort();
        found
    }

    #[test]
    fn test_rejects_zero_minsup() {
        let database = SequenceDatabase::from_itemsets(vec![vec![vec![1]]]);
        assert!(matches!(
            BidePlus::new(0).run(&database, None),
            Err(MineError::InvalidMinsup)
        ));
    }

    #[test]
    fn test_rejects_invalid_database() {
        let database = SequenceDatabase::from_itemsets(vec![vec![vec![3, 1]]]);
        assert!(matches!(
            BidePlus::new(1).run(&database, None),
            Err(MineError::InvalidDatabase(_))
        ));
    }

    #[test]
    fn test_forward_extension_suppresses_prefixes() {
        // every sequence is (1)(2): the singletons are absorbed
        let found = mine(
            vec![
                vec![vec![1], vec![2]],
                vec![vec![1], vec![2]],
                vec![vec![1], vec![2]],
            ],
            2,
        );
        assert_eq!(found, vec![(vec![vec![1], vec![2]], 3)]);
    }

    #[test]
    fn test_itemset_extension_survives_over_sequence_extension() {
        // 2 extends 1 both inside the first itemset and as a new itemset;
        // only the combined closed pattern remains
        let found = mine(
            vec![vec![vec![1, 2], vec![2]], vec![vec![1, 2], vec![2]]],
            2,
        );
        assert_eq!(found, vec![(vec![vec![1, 2], vec![2]], 2)]);
    }

    #[test]
    fn test_projection_counts_sequences_with_later_occurrences() {
        let database = SequenceDatabase::from_itemsets(vec![
            vec![vec![1], vec![2]],
            vec![vec![2], vec![1]],
            vec![vec![2]],
        ]);
        let initial: Vec<PseudoSequence> = database
            .sequences()
            .iter()
            .filter_map(PseudoSequence::spanning)
            .collect();

        // sequences where something remains after an occurrence of 2
        let projected = project(2, &initial, false);
        let ids: std::collections::HashSet<usize> =
            projected.iter().map(PseudoSequence::id).collect();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains(&1));
    }

    #[test]
    fn test_growth_pairs_separate_postfix_contexts() {
        let database = SequenceDatabase::from_itemsets(vec![vec![vec![1, 2], vec![2]]]);
        let initial: Vec<PseudoSequence> = database
            .sequences()
            .iter()
            .filter_map(PseudoSequence::spanning)
            .collect();
        let projected = project(1, &initial, false);
        let pairs = frequent_pairs(&projected);
        assert_eq!(pairs.len(), 2);
        let keys: std::collections::HashSet<(Item, bool, bool)> = pairs
            .iter()
            .map(|(k, _)| (k.item, k.is_prefix, k.is_postfix))
            .collect();
        assert!(keys.contains(&(2, false, true)));
        assert!(keys.contains(&(2, false, false)));
    }
}
