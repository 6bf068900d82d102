// Prefix summary: group combos by their opening picks.
//
// Answers "given the first N picks of a draft, how many distinct legal
// outcomes remain and which role could have produced them". Each combo
// counts once per group regardless of how many tree paths reached it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::combos::ComboTable;
use crate::role::Feasibility;

/// Header returned when no combo survives the filters.
pub const NO_RESULTS_HEADER: &str = "No valid combinations";

/// Header for a non-empty combo table.
pub fn results_header(combo_count: usize) -> String {
    format!("{combo_count} unique final combos after filters")
}

// ---------------------------------------------------------------------------
// Prefix groups
// ---------------------------------------------------------------------------

/// Per-prefix counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefixGroup {
    /// Combos in this group reachable under the first-pick role.
    pub first_count: usize,
    /// Combos in this group reachable under the second-pick role.
    pub second_count: usize,
    /// All combos sharing this prefix.
    pub total_count: usize,
}

impl PrefixGroup {
    pub fn feasibility(&self) -> Feasibility {
        Feasibility::from_counts(self.first_count, self.second_count)
    }
}

/// Group every combo with at least `prefix_len` picks by its leading ranks.
pub fn group_by_prefix(table: &ComboTable, prefix_len: usize) -> BTreeMap<Vec<u32>, PrefixGroup> {
    let mut groups: BTreeMap<Vec<u32>, PrefixGroup> = BTreeMap::new();
    for (picks, entry) in table.iter() {
        if picks.len() < prefix_len {
            continue;
        }
        let group = groups.entry(picks[..prefix_len].to_vec()).or_default();
        if entry.first_ok {
            group.first_count += 1;
        }
        if entry.second_ok {
            group.second_count += 1;
        }
        group.total_count += 1;
    }
    groups
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One displayable row of the prefix summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixRow {
    /// The shared opening picks.
    pub prefix: Vec<u32>,
    /// Number of distinct combos starting with `prefix`.
    pub total: usize,
    /// Share of all grouped combos, formatted to one decimal place.
    pub percent: String,
    /// Role assignments consistent with this prefix.
    pub feasibility: Feasibility,
}

impl PrefixRow {
    /// Render the prefix as a tuple, e.g. `(1, 2, 4)`.
    pub fn prefix_label(&self) -> String {
        format_prefix(&self.prefix)
    }
}

/// Tuple-style rendering of a pick sequence.
pub fn format_prefix(prefix: &[u32]) -> String {
    let parts: Vec<String> = prefix.iter().map(|r| r.to_string()).collect();
    if parts.len() == 1 {
        format!("({},)", parts[0])
    } else {
        format!("({})", parts.join(", "))
    }
}

/// Header plus ordered rows, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub header: String,
    pub rows: Vec<PrefixRow>,
}

/// Summarize `table` by prefixes of length `prefix_len`.
///
/// An empty table short-circuits to the "no results" header with no rows.
/// A non-empty table whose entries are all shorter than `prefix_len` yields
/// the regular header and no rows.
pub fn summarize(table: &ComboTable, prefix_len: usize) -> Summary {
    if table.is_empty() {
        return Summary {
            header: NO_RESULTS_HEADER.to_string(),
            rows: Vec::new(),
        };
    }

    let groups = group_by_prefix(table, prefix_len);
    let grand_total: usize = groups.values().map(|g| g.total_count).sum();

    let rows = groups
        .into_iter()
        .map(|(prefix, group)| PrefixRow {
            prefix,
            total: group.total_count,
            percent: format!(
                "{:.1}",
                group.total_count as f64 / grand_total as f64 * 100.0
            ),
            feasibility: group.feasibility(),
        })
        .collect();

    Summary {
        header: results_header(table.len()),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combos::RankFilter;
    use crate::tree::{DraftNode, DraftTree};

    fn leaf(picks: &[u32], first_ok: bool, second_ok: bool) -> DraftNode {
        let mut node = DraftNode::root();
        node.picks = picks.to_vec();
        node.first_ok = first_ok;
        node.second_ok = second_ok;
        node
    }

    fn table_of(leaves: &[DraftNode]) -> ComboTable {
        ComboTable::from_leaves(leaves, &RankFilter::none())
    }

    #[test]
    fn empty_table_reports_no_results() {
        let summary = summarize(&ComboTable::default(), 1);
        assert_eq!(summary.header, "No valid combinations");
        assert!(summary.rows.is_empty());
    }

    #[test]
    fn multiplicity_does_not_weight_groups() {
        let leaves = [
            leaf(&[1, 2], true, false),
            leaf(&[1, 2], false, true),
            leaf(&[1, 2], false, true),
            leaf(&[2, 3], false, true),
        ];
        let summary = summarize(&table_of(&leaves), 1);
        assert_eq!(summary.header, "2 unique final combos after filters");
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].total, 1);
        assert_eq!(summary.rows[0].percent, "50.0");
        assert_eq!(summary.rows[0].feasibility, Feasibility::Both);
        assert_eq!(summary.rows[1].percent, "50.0");
        assert_eq!(summary.rows[1].feasibility, Feasibility::Second);
    }

    #[test]
    fn short_entries_are_left_out_of_groups() {
        let leaves = [
            leaf(&[1], true, false),
            leaf(&[1, 2], true, false),
            leaf(&[1, 3], true, false),
        ];
        let table = table_of(&leaves);
        let groups = group_by_prefix(&table, 2);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.values().map(|g| g.total_count).sum::<usize>(), 2);
    }

    #[test]
    fn prefix_longer_than_every_entry_gives_no_rows() {
        let tree = DraftTree::grow(2);
        let table = ComboTable::aggregate(&tree, &RankFilter::none());
        let summary = summarize(&table, 3);
        assert_eq!(summary.header, "4 unique final combos after filters");
        assert!(summary.rows.is_empty());
    }

    #[test]
    fn rows_are_sorted_by_prefix() {
        let tree = DraftTree::grow(4);
        let table = ComboTable::aggregate(&tree, &RankFilter::none());
        let summary = summarize(&table, 2);
        let prefixes: Vec<&Vec<u32>> = summary.rows.iter().map(|r| &r.prefix).collect();
        assert_eq!(
            prefixes,
            vec![&vec![1, 2], &vec![1, 3], &vec![1, 4], &vec![2, 3]]
        );
        let totals: Vec<usize> = summary.rows.iter().map(|r| r.total).collect();
        assert_eq!(totals, vec![13, 8, 3, 6]);
        let percents: Vec<&str> = summary.rows.iter().map(|r| r.percent.as_str()).collect();
        assert_eq!(percents, vec!["43.3", "26.7", "10.0", "20.0"]);
    }

    #[test]
    fn group_counts_flags_once_per_combo() {
        let leaves = [
            leaf(&[1, 2], true, true),
            leaf(&[1, 3], true, false),
        ];
        let groups = group_by_prefix(&table_of(&leaves), 1);
        let group = groups[&vec![1]];
        assert_eq!(group.first_count, 2);
        assert_eq!(group.second_count, 1);
        assert_eq!(group.total_count, 2);
    }

    #[test]
    fn format_prefix_matches_tuple_style() {
        assert_eq!(format_prefix(&[1]), "(1,)");
        assert_eq!(format_prefix(&[1, 2, 4]), "(1, 2, 4)");
        assert_eq!(format_prefix(&[]), "()");
    }

    #[test]
    fn row_serializes_with_lowercase_feasibility() {
        let row = PrefixRow {
            prefix: vec![1],
            total: 8,
            percent: "72.7".into(),
            feasibility: Feasibility::Both,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"prefix":[1],"total":8,"percent":"72.7","feasibility":"both"}"#
        );
        assert_eq!(row.prefix_label(), "(1,)");
    }
}
