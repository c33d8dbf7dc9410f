//! Pseudo-sequence cursors and prefix periods
//!
//! A pseudo-sequence is a value-like cursor into a base sequence: it never
//! copies itemsets, only offsets. Projection narrows the left edge; periods
//! are bounded on both edges. The first visible itemset is a *postfix* when
//! the cursor landed mid-itemset, and an itemset is *cut at right* when the
//! base itemset continues past the right bound.

use crate::database::{Item, Itemset, Sequence};

/// Absolute item-level position in a base sequence, ordered lexicographically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Pos {
    itemset: usize,
    item: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct PseudoSequence<'a> {
    seq: &'a Sequence,
    first_itemset: usize,
    first_item: usize,
    last_itemset: usize,
    last_item: usize,
}

impl<'a> PseudoSequence<'a> {
    /// Cursor over the whole of `seq`, or `None` for an empty sequence
    pub fn spanning(seq: &'a Sequence) -> Option<Self> {
        if seq.is_empty() {
            return None;
        }
        let last_itemset = seq.len() - 1;
        Some(Self {
            seq,
            first_itemset: 0,
            first_item: 0,
            last_itemset,
            last_item: seq.itemset(last_itemset).len() - 1,
        })
    }

    /// Child cursor starting at visible position `(itemset, item)`, keeping
    /// the right bound; `None` when nothing remains addressable
    pub fn advanced_to(&self, itemset: usize, item: usize) -> Option<Self> {
        let abs_itemset = self.first_itemset + itemset;
        let abs_item = item + if itemset == 0 { self.first_item } else { 0 };
        let start = Pos {
            itemset: abs_itemset,
            item: abs_item,
        };
        let end = Pos {
            itemset: self.last_itemset,
            item: self.last_item,
        };
        if start > end {
            return None;
        }
        Some(Self {
            seq: self.seq,
            first_itemset: abs_itemset,
            first_item: abs_item,
            last_itemset: self.last_itemset,
            last_item: self.last_item,
        })
    }

    /// Base sequence ID
    pub fn id(&self) -> usize {
        self.seq.id()
    }

    /// Number of visible itemsets
    pub fn size(&self) -> usize {
        self.last_itemset - self.first_itemset + 1
    }

    /// Visible item count of the i-th visible itemset
    pub fn size_of_itemset_at(&self, i: usize) -> usize {
        let idx = self.first_itemset + i;
        let hi = if idx == self.last_itemset {
            self.last_item + 1
        } else {
            self.seq.itemset(idx).len()
        };
        let lo = if i == 0 { self.first_item } else { 0 };
        hi - lo
    }

    /// The j-th visible item of the i-th visible itemset
    pub fn item_at(&self, j: usize, i: usize) -> Item {
        let offset = if i == 0 { self.first_item } else { 0 };
        self.seq.itemset(self.first_itemset + i).item_at(offset + j)
    }

    /// Visible index of `item` within the i-th visible itemset
    pub fn index_of(&self, i: usize, item: Item) -> Option<usize> {
        (0..self.size_of_itemset_at(i)).find(|&j| self.item_at(j, i) == item)
    }

    /// True iff the i-th visible itemset is the right-side remainder of a
    /// base itemset whose left part was consumed by projection
    pub fn is_postfix(&self, i: usize) -> bool {
        i == 0 && self.first_item != 0
    }

    /// True iff the base itemset behind the i-th visible itemset continues
    /// past the right bound of this cursor
    pub fn is_cut_at_right(&self, i: usize) -> bool {
        let idx = self.first_itemset + i;
        idx == self.last_itemset && self.last_item + 1 < self.seq.itemset(idx).len()
    }

    /// The i-th maximum period of `prefix` in the base sequence: the region
    /// strictly between the end of the first instance of the first `i` prefix
    /// items and the start of the rightmost match of the remaining items.
    /// `None` when the region is empty or the prefix does not occur.
    pub fn ith_maximum_period(&self, prefix: &[Itemset], i: usize) -> Option<Self> {
        let upper = last_instance_start(self.seq, prefix, i)?;
        self.period_between(prefix, i, upper)
    }

    /// The i-th semi-maximum period: same lower bound, but the upper bound is
    /// the last-in-first appearance of the i-th item, found by walking the
    /// prefix items right-to-left inside the window of the first instance.
    /// Always contained in the i-th maximum period.
    pub fn ith_semi_maximum_period(&self, prefix: &[Itemset], i: usize) -> Option<Self> {
        let n: usize = prefix.iter().map(Itemset::len).sum();
        let positions = first_instance(self.seq, prefix, n)?;
        let mut upper = *positions.last()?;
        for k in (i..n.saturating_sub(1)).rev() {
            upper = last_occurrence_before(self.seq, flat_item(prefix, k)?, upper)?;
        }
        self.period_between(prefix, i, upper)
    }

    fn period_between(&self, prefix: &[Itemset], i: usize, upper: Pos) -> Option<Self> {
        let start = if i == 0 {
            Pos { itemset: 0, item: 0 }
        } else {
            let lower = *first_instance(self.seq, prefix, i)?.last()?;
            successor(self.seq, lower)?
        };
        let end = predecessor(self.seq, upper)?;
        if start > end {
            return None;
        }
        Some(Self {
            seq: self.seq,
            first_itemset: start.itemset,
            first_item: start.item,
            last_itemset: end.itemset,
            last_item: end.item,
        })
    }
}

/// The `k`-th item occurrence of a pattern, counting across itemsets
fn flat_item(prefix: &[Itemset], mut k: usize) -> Option<Item> {
    for itemset in prefix {
        if k < itemset.len() {
            return Some(itemset.item_at(k));
        }
        k -= itemset.len();
    }
    None
}

/// Pattern itemset index and in-itemset offset of the `k`-th item occurrence
fn locate(prefix: &[Itemset], mut k: usize) -> Option<(usize, usize)> {
    for (idx, itemset) in prefix.iter().enumerate() {
        if k < itemset.len() {
            return Some((idx, k));
        }
        k -= itemset.len();
    }
    None
}

/// Leftmost match of the first `n_items` occurrences of `prefix` in `seq`.
/// Pattern itemsets are matched as subsets of single sequence itemsets at
/// strictly increasing itemset positions; the final pattern itemset may be
/// matched partially when `n_items` ends inside it. Returns the position of
/// every matched item occurrence.
fn first_instance(seq: &Sequence, prefix: &[Itemset], n_items: usize) -> Option<Vec<Pos>> {
    let mut positions = Vec::with_capacity(n_items);
    let mut remaining = n_items;
    let mut next_itemset = 0;
    for itemset in prefix {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(itemset.len());
        let group = &itemset.items()[..take];
        let found = (next_itemset..seq.len()).find(|&s| seq.itemset(s).contains_all(group))?;
        let target = seq.itemset(found);
        for &item in group {
            positions.push(Pos {
                itemset: found,
                item: target.index_of(item)?,
            });
        }
        next_itemset = found + 1;
        remaining -= take;
    }
    if remaining > 0 {
        return None;
    }
    Some(positions)
}

/// Start position of the rightmost match of the prefix items from occurrence
/// `i` onward (the last-in-last appearance of the i-th item). The pattern
/// itemset holding occurrence `i` contributes only its item suffix.
fn last_instance_start(seq: &Sequence, prefix: &[Itemset], i: usize) -> Option<Pos> {
    let (first_group, offset) = locate(prefix, i)?;
    let mut bound = seq.len();
    for k in (first_group..prefix.len()).rev() {
        let group = if k == first_group {
            &prefix[k].items()[offset..]
        } else {
            prefix[k].items()
        };
        let found = (0..bound)
            .rev()
            .find(|&s| seq.itemset(s).contains_all(group))?;
        bound = found;
    }
    let item = flat_item(prefix, i)?;
    Some(Pos {
        itemset: bound,
        item: seq.itemset(bound).index_of(item)?,
    })
}

/// Latest occurrence of `item` strictly before `bound`
fn last_occurrence_before(seq: &Sequence, item: Item, bound: Pos) -> Option<Pos> {
    for s in (0..=bound.itemset).rev() {
        if let Some(j) = seq.itemset(s).index_of(item) {
            if s < bound.itemset || j < bound.item {
                return Some(Pos { itemset: s, item: j });
            }
        }
    }
    None
}

fn successor(seq: &Sequence, pos: Pos) -> Option<Pos> {
    if pos.item + 1 < seq.itemset(pos.itemset).len() {
        Some(Pos {
            itemset: pos.itemset,
            item: pos.item + 1,
        })
    } else if pos.itemset + 1 < seq.len() {
        Some(Pos {
            itemset: pos.itemset + 1,
            item: 0,
        })
    } else {
        None
    }
}

fn predecessor(seq: &Sequence, pos: Pos) -> Option<Pos> {
    if pos.item > 0 {
        Some(Pos {
            itemset: pos.itemset,
            item: pos.item - 1,
        })
    } else if pos.itemset > 0 {
        let itemset = pos.itemset - 1;
        Some(Pos {
            itemset,
            item: seq.itemset(itemset).len() - 1,
        })
    } else {
        None
    }
}
