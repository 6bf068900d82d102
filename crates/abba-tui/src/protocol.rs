// Message types passed between the TUI and the app orchestrator.

use std::time::Duration;

use abba_core::{AnalysisParams, AnalysisReport};

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Rebuild the draft tree and summary for these parameters.
    Recompute(AnalysisParams),
    /// Shut down the orchestrator.
    Quit,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// A build for `params` has started.
    AnalysisStarted {
        generation: u64,
        params: AnalysisParams,
    },
    /// The latest build finished.
    AnalysisReady {
        generation: u64,
        report: Box<AnalysisReport>,
        elapsed: Duration,
    },
    /// The latest request could not be run.
    AnalysisFailed { generation: u64, message: String },
}

/// Internal event from a spawned analysis task back to the orchestrator.
#[derive(Debug)]
pub struct AnalysisEvent {
    pub generation: u64,
    pub outcome: Result<AnalysisReport, String>,
    pub elapsed: Duration,
}

/// Progress of the most recent analysis as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStatus {
    Idle,
    Running,
    Ready,
    Failed(String),
}
