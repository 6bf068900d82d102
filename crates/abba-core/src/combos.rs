// Combo aggregation: collapse tree leaves into distinct final sequences.
//
// Many tree paths end on the same pick sequence (one reached under each
// role, for instance). The combo table keeps one entry per sequence with
// the role flags OR-merged across every path that produced it.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::tree::{DraftNode, DraftTree};

// ---------------------------------------------------------------------------
// Rank filter
// ---------------------------------------------------------------------------

/// Inclusion/exclusion constraints on final sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankFilter {
    included: BTreeSet<u32>,
    excluded: BTreeSet<u32>,
}

impl RankFilter {
    pub fn new(
        included: impl IntoIterator<Item = u32>,
        excluded: impl IntoIterator<Item = u32>,
    ) -> Self {
        RankFilter {
            included: included.into_iter().collect(),
            excluded: excluded.into_iter().collect(),
        }
    }

    /// A filter that keeps everything.
    pub fn none() -> Self {
        RankFilter::default()
    }

    /// Ranks every kept sequence must contain.
    pub fn included(&self) -> &BTreeSet<u32> {
        &self.included
    }

    /// Ranks no kept sequence may contain.
    pub fn excluded(&self) -> &BTreeSet<u32> {
        &self.excluded
    }

    /// Whether a sequence contains every included rank and no excluded one.
    pub fn admits(&self, picks: &[u32]) -> bool {
        let has_all = self.included.iter().all(|rank| picks.contains(rank));
        let has_none = !picks.iter().any(|rank| self.excluded.contains(rank));
        has_all && has_none
    }
}

// ---------------------------------------------------------------------------
// Combo entry
// ---------------------------------------------------------------------------

/// Merged record for one distinct final sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComboEntry {
    /// Reachable by some surviving path under the first-pick role.
    pub first_ok: bool,
    /// Reachable by some surviving path under the second-pick role.
    pub second_ok: bool,
    /// Number of tree paths that ended on this sequence.
    pub multiplicity: usize,
}

impl ComboEntry {
    fn from_leaf(leaf: &DraftNode) -> Self {
        ComboEntry {
            first_ok: leaf.first_ok,
            second_ok: leaf.second_ok,
            multiplicity: 1,
        }
    }

    fn merge(&mut self, leaf: &DraftNode) {
        self.first_ok |= leaf.first_ok;
        self.second_ok |= leaf.second_ok;
        self.multiplicity += 1;
    }
}

// ---------------------------------------------------------------------------
// Combo table
// ---------------------------------------------------------------------------

/// Distinct final sequences keyed in ascending tuple order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboTable {
    entries: BTreeMap<Vec<u32>, ComboEntry>,
}

impl ComboTable {
    /// Aggregate the leaves of `tree` that pass `filter`.
    pub fn aggregate(tree: &DraftTree, filter: &RankFilter) -> Self {
        let table = ComboTable::from_leaves(tree.leaves(), filter);
        debug!(
            "Aggregated {} leaves into {} combos (included={:?}, excluded={:?})",
            tree.leaf_count(),
            table.len(),
            filter.included(),
            filter.excluded()
        );
        table
    }

    /// Aggregate an arbitrary set of leaves.
    pub fn from_leaves<'a>(
        leaves: impl IntoIterator<Item = &'a DraftNode>,
        filter: &RankFilter,
    ) -> Self {
        let mut entries: BTreeMap<Vec<u32>, ComboEntry> = BTreeMap::new();
        for leaf in leaves {
            if !filter.admits(&leaf.picks) {
                continue;
            }
            match entries.get_mut(leaf.picks.as_slice()) {
                Some(entry) => entry.merge(leaf),
                None => {
                    entries.insert(leaf.picks.clone(), ComboEntry::from_leaf(leaf));
                }
            }
        }
        ComboTable { entries }
    }

    /// Number of distinct sequences.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, picks: &[u32]) -> Option<&ComboEntry> {
        self.entries.get(picks)
    }

    /// Entries in ascending sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u32], &ComboEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// Sum of multiplicities, i.e. the surviving leaf count.
    pub fn total_multiplicity(&self) -> usize {
        self.entries.values().map(|e| e.multiplicity).sum()
    }

    /// Number of entries with at least `len` picks.
    pub fn count_at_least(&self, len: usize) -> usize {
        self.entries.keys().filter(|k| k.len() >= len).count()
    }
}

/// Build a combo table directly from a tree and raw rank lists.
pub fn aggregate(tree: &DraftTree, included: &[u32], excluded: &[u32]) -> ComboTable {
    let filter = RankFilter::new(included.iter().copied(), excluded.iter().copied());
    ComboTable::aggregate(tree, &filter)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
