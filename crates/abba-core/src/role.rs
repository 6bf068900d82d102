// Draft roles and the ABBA turn-order bound.
//
// In a 1-v-1 ABBA draft the first pick belongs to one side alone, after
// which picks come in same-side pairs (A B B A A B B ...). Whether our side
// holds the first or the second pick decides how many ranks the opponent may
// already have claimed before each of our picks.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Which side of the draft our picks are assumed to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// We make the very first pick of the draft.
    First,
    /// The opponent makes the very first pick.
    Second,
}

impl Role {
    /// Both roles, in the order their branches are expanded.
    pub const ALL: [Role; 2] = [Role::First, Role::Second];

    /// Number of picks the opponent has made before our `depth`-th pick.
    ///
    /// `depth` is the 1-based index of the pick about to be chosen along our
    /// own sequence.
    pub fn opponent_picks_before(self, depth: usize) -> u32 {
        let own_taken = own_taken(depth);
        let odd = depth % 2 == 1;
        match (self, odd) {
            (Role::First, true) | (Role::Second, false) => own_taken,
            (Role::First, false) | (Role::Second, true) => own_taken + 1,
        }
    }

    /// Highest rank we could legally take with our `depth`-th pick.
    ///
    /// Every rank above ours is either ours or was skipped by the opponent,
    /// so the bound is the opponent's picks so far plus our own plus one.
    pub fn rank_bound(self, depth: usize) -> u32 {
        self.opponent_picks_before(depth) + 1 + own_taken(depth)
    }

    /// The opposite role.
    pub fn other(self) -> Role {
        match self {
            Role::First => Role::Second,
            Role::Second => Role::First,
        }
    }

    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::First => "first",
            Role::Second => "second",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn own_taken(depth: usize) -> u32 {
    depth.saturating_sub(1) as u32
}

// ---------------------------------------------------------------------------
// Feasibility
// ---------------------------------------------------------------------------

/// Which role assignments remain consistent with a group of outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feasibility {
    Both,
    First,
    Second,
}

impl Feasibility {
    /// Classify from per-role counts.
    ///
    /// Anything without a first-role outcome is reported as `Second`, which
    /// also covers the degenerate both-zero case.
    pub fn from_counts(first_count: usize, second_count: usize) -> Self {
        match (first_count > 0, second_count > 0) {
            (true, true) => Feasibility::Both,
            (true, false) => Feasibility::First,
            (false, _) => Feasibility::Second,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feasibility::Both => "both",
            Feasibility::First => "first",
            Feasibility::Second => "second",
        }
    }
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
