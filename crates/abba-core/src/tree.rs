// Draft tree generation.
//
// Grows every legal pick sequence of a 1-v-1 ABBA draft up to a requested
// length. Nodes live in a flat arena and are expanded breadth-first, so the
// children of a node always occupy one contiguous index range. A node whose
// range is empty is a leaf.

use std::ops::Range;
use std::time::Instant;

use tracing::debug;

use crate::role::Role;

// ---------------------------------------------------------------------------
// DraftNode
// ---------------------------------------------------------------------------

/// One partial or complete draft path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftNode {
    /// Ranks taken along this path, strictly increasing.
    pub picks: Vec<u32>,
    /// Path is legal if we hold the first pick.
    pub first_ok: bool,
    /// Path is legal if we hold the second pick.
    pub second_ok: bool,
    children: Range<usize>,
}

impl DraftNode {
    /// The empty path; legal under either role.
    pub fn root() -> Self {
        DraftNode {
            picks: Vec::new(),
            first_ok: true,
            second_ok: true,
            children: 0..0,
        }
    }

    /// Number of picks made along this path.
    pub fn depth(&self) -> usize {
        self.picks.len()
    }

    /// Rank of the most recent pick, or 0 for the empty path.
    pub fn last_pick(&self) -> u32 {
        self.picks.last().copied().unwrap_or(0)
    }

    /// Whether this path is still legal under `role`.
    pub fn allows(&self, role: Role) -> bool {
        match role {
            Role::First => self.first_ok,
            Role::Second => self.second_ok,
        }
    }

    /// Arena indices of this node's children.
    pub fn children(&self) -> Range<usize> {
        self.children.clone()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Every one-pick extension of this path along the `role` branch.
    ///
    /// Candidates are the ranks in `(last_pick, bound]`. When the bound does
    /// not exceed the last pick the branch is empty; if the other branch is
    /// empty too the node stays a short leaf.
    pub fn branch(&self, role: Role) -> Vec<DraftNode> {
        if !self.allows(role) {
            return Vec::new();
        }
        let bound = role.rank_bound(self.depth() + 1);
        (self.last_pick() + 1..=bound)
            .map(|rank| self.extend(role, rank))
            .collect()
    }

    /// Child taking `rank` under `role`. The child is exclusive to `role`.
    fn extend(&self, role: Role, rank: u32) -> DraftNode {
        let mut picks = Vec::with_capacity(self.picks.len() + 1);
        picks.extend_from_slice(&self.picks);
        picks.push(rank);

        let mut child = DraftNode {
            picks,
            first_ok: self.first_ok,
            second_ok: self.second_ok,
            children: 0..0,
        };
        match role.other() {
            Role::First => child.first_ok = false,
            Role::Second => child.second_ok = false,
        }
        child
    }
}

// ---------------------------------------------------------------------------
// DraftTree
// ---------------------------------------------------------------------------

/// Every legal pick sequence up to `max_picks`, stored as an arena.
///
/// Index 0 is always the root.
#[derive(Debug, Clone)]
pub struct DraftTree {
    nodes: Vec<DraftNode>,
    max_picks: usize,
}

impl DraftTree {
    /// Build the full tree of sequences with at most `max_picks` picks.
    pub fn grow(max_picks: usize) -> Self {
        let started = Instant::now();
        let mut nodes = vec![DraftNode::root()];

        let mut next = 0;
        while next < nodes.len() {
            if nodes[next].depth() < max_picks {
                let parent = &nodes[next];
                let children: Vec<DraftNode> = Role::ALL
                    .iter()
                    .flat_map(|&role| parent.branch(role))
                    .collect();

                let start = nodes.len();
                nodes.extend(children);
                nodes[next].children = start..nodes.len();
            }
            next += 1;
        }

        let tree = DraftTree { nodes, max_picks };
        debug!(
            "Grew draft tree: max_picks={}, {} nodes, {} leaves in {:?}",
            max_picks,
            tree.len(),
            tree.leaf_count(),
            started.elapsed()
        );
        tree
    }

    pub fn root(&self) -> &DraftNode {
        &self.nodes[0]
    }

    pub fn max_picks(&self) -> usize {
        self.max_picks
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is present even for `max_picks == 0`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in breadth-first order.
    pub fn nodes(&self) -> &[DraftNode] {
        &self.nodes
    }

    /// Immediate children of `node`.
    pub fn children_of(&self, node: &DraftNode) -> &[DraftNode] {
        &self.nodes[node.children()]
    }

    /// Nodes with no children, including short leaves.
    pub fn leaves(&self) -> impl Iterator<Item = &DraftNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Leaves that stopped before reaching `max_picks`.
    pub fn short_leaves(&self) -> impl Iterator<Item = &DraftNode> {
        let max_picks = self.max_picks;
        self.leaves().filter(move |n| n.depth() < max_picks)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
