// Analysis entry point: tree -> combo table -> prefix summary.
//
// Every call regenerates the tree from scratch. The tree is dropped as soon
// as its leaves have been aggregated, so only the combo table outlives the
// build step.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::combos::{ComboTable, RankFilter};
use crate::summary::{summarize, PrefixRow};
use crate::tree::DraftTree;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid analysis parameter `{field}`: {message}")]
    InvalidParams {
        field: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Everything one analysis run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Longest pick sequence to enumerate.
    pub max_picks: usize,
    /// Number of leading picks to group by.
    pub prefix_len: usize,
    /// Ranks every retained sequence must contain.
    #[serde(default)]
    pub included: Vec<u32>,
    /// Ranks no retained sequence may contain.
    #[serde(default)]
    pub excluded: Vec<u32>,
}

impl AnalysisParams {
    /// Unfiltered parameters.
    pub fn new(max_picks: usize, prefix_len: usize) -> Self {
        AnalysisParams {
            max_picks,
            prefix_len,
            included: Vec::new(),
            excluded: Vec::new(),
        }
    }

    pub fn with_included(mut self, included: Vec<u32>) -> Self {
        self.included = included;
        self
    }

    pub fn with_excluded(mut self, excluded: Vec<u32>) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn filter(&self) -> RankFilter {
        RankFilter::new(self.included.iter().copied(), self.excluded.iter().copied())
    }

    /// Check `1 <= prefix_len <= max_picks`.
    ///
    /// The algorithm itself accepts anything; this is for callers that want
    /// to reject nonsensical input before spending time on a build.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.max_picks == 0 {
            return Err(AnalysisError::InvalidParams {
                field: "max_picks",
                message: "must be greater than 0".into(),
            });
        }
        if self.prefix_len == 0 {
            return Err(AnalysisError::InvalidParams {
                field: "prefix_len",
                message: "must be greater than 0".into(),
            });
        }
        if self.prefix_len > self.max_picks {
            return Err(AnalysisError::InvalidParams {
                field: "prefix_len",
                message: format!(
                    "must not exceed max_picks ({}), got {}",
                    self.max_picks, self.prefix_len
                ),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub header: String,
    pub rows: Vec<PrefixRow>,
    /// Distinct sequences left after filtering.
    pub combo_count: usize,
}

impl AnalysisReport {
    /// True when the filters removed every outcome.
    pub fn is_empty(&self) -> bool {
        self.combo_count == 0
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Build the tree for `max_picks` and aggregate its surviving leaves.
pub fn enumerate_combos(max_picks: usize, filter: &RankFilter) -> ComboTable {
    let tree = DraftTree::grow(max_picks);
    ComboTable::aggregate(&tree, filter)
}

/// Run a full analysis for `params`.
pub fn run_analysis_report(params: &AnalysisParams) -> AnalysisReport {
    let started = Instant::now();

    let table = enumerate_combos(params.max_picks, &params.filter());
    let summary = summarize(&table, params.prefix_len);
    debug!(
        "Summarized {} combos into {} prefix rows (prefix_len={})",
        table.len(),
        summary.rows.len(),
        params.prefix_len
    );

    info!(
        "Analysis finished: max_picks={}, prefix_len={}, {} combos in {:?}",
        params.max_picks,
        params.prefix_len,
        table.len(),
        started.elapsed()
    );

    AnalysisReport {
        header: summary.header,
        rows: summary.rows,
        combo_count: table.len(),
    }
}

/// Header text and ordered prefix rows for one set of inputs.
pub fn run_analysis(
    max_picks: usize,
    included: &[u32],
    excluded: &[u32],
    prefix_len: usize,
) -> (String, Vec<PrefixRow>) {
    let params = AnalysisParams::new(max_picks, prefix_len)
        .with_included(included.to_vec())
        .with_excluded(excluded.to_vec());
    let report = run_analysis_report(&params);
    (report.header, report.rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
