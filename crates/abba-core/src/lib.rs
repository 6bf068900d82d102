// Library root for the ABBA draft engine.
//
// Enumerates every legal pick sequence of a 1-v-1 ABBA draft, collapses
// them into distinct combos and summarizes them by opening picks.

pub mod analysis;
pub mod combos;
pub mod role;
pub mod summary;
pub mod tree;

pub use analysis::{
    enumerate_combos, run_analysis, run_analysis_report, AnalysisError, AnalysisParams,
    AnalysisReport,
};
pub use combos::{aggregate, ComboEntry, ComboTable, RankFilter};
pub use role::{Feasibility, Role};
pub use summary::{summarize, PrefixRow, Summary};
pub use tree::{DraftNode, DraftTree};
