// Application orchestration: runs analyses on behalf of the TUI.
//
// The TUI sends `Recompute` commands whenever a parameter changes. Each
// request bumps a generation counter, cancels the in-flight task and spawns
// a new one. The task waits out `RECOMPUTE_DEBOUNCE` before building the
// tree on Tokio's blocking pool, so a burst of slider steps only builds the
// last one. Results come back over an internal channel; anything from an
// older generation is dropped before it reaches the TUI.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use abba_core::{run_analysis_report, AnalysisParams};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::protocol::{AnalysisEvent, UiUpdate, UserCommand};

/// Quiet period a request must survive before its build starts.
pub const RECOMPUTE_DEBOUNCE: Duration = Duration::from_millis(120);

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Orchestrator state.
pub struct AppState {
    /// Monotonically increasing id of the most recent request. Events from
    /// older generations are discarded in `handle_analysis_event`.
    pub generation: u64,
    /// Parameters of the most recent valid request.
    pub last_params: Option<AnalysisParams>,
    pub current_task: Option<tokio::task::JoinHandle<()>>,
    /// Builds that got past the debounce and reached the blocking pool.
    pub builds_started: Arc<AtomicU64>,
    /// Sender handed to spawned tasks so they can report back.
    pub analysis_tx: mpsc::Sender<AnalysisEvent>,
}

impl AppState {
    pub fn new(analysis_tx: mpsc::Sender<AnalysisEvent>) -> Self {
        AppState {
            generation: 0,
            last_params: None,
            current_task: None,
            builds_started: Arc::new(AtomicU64::new(0)),
            analysis_tx,
        }
    }

    /// Abort the in-flight analysis task, if any.
    ///
    /// A task still inside its debounce window never builds. One that has
    /// already reached the blocking pool runs to completion, but its result
    /// is never forwarded.
    pub fn cancel_analysis_task(&mut self) {
        if let Some(handle) = self.current_task.take() {
            handle.abort();
            debug!("Cancelled previous analysis task");
        }
    }

    /// Start a new generation and spawn the build for `params`.
    ///
    /// Returns the generation assigned to the request.
    pub fn start_analysis(&mut self, params: AnalysisParams) -> u64 {
        self.cancel_analysis_task();
        self.generation += 1;
        let generation = self.generation;
        self.last_params = Some(params.clone());

        let tx = self.analysis_tx.clone();
        let builds_started = Arc::clone(&self.builds_started);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(RECOMPUTE_DEBOUNCE).await;
            let count = builds_started.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("Building generation {} (build #{})", generation, count);
            let started = Instant::now();
            let outcome = tokio::task::spawn_blocking(move || run_analysis_report(&params))
                .await
                .map_err(|e| format!("analysis task failed: {e}"));
            let _ = tx
                .send(AnalysisEvent {
                    generation,
                    outcome,
                    elapsed: started.elapsed(),
                })
                .await;
        });
        self.current_task = Some(handle);
        generation
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator until `Quit` arrives or the command channel closes.
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut analysis_rx: mpsc::Receiver<AnalysisEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let mut analysis_open = true;

    loop {
        tokio::select! {
            // --- Finished analyses (only poll when channel is open) ---
            event = analysis_rx.recv(), if analysis_open => {
                match event {
                    Some(event) => {
                        handle_analysis_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("Analysis channel closed");
                        analysis_open = false;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    state.cancel_analysis_task();
    info!("Application event loop exiting");
    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Recompute(params) => {
            if let Err(e) = params.validate() {
                // Still supersedes whatever was running for the old inputs.
                state.cancel_analysis_task();
                state.generation += 1;
                warn!("Rejected analysis request: {}", e);
                let _ = ui_tx
                    .send(UiUpdate::AnalysisFailed {
                        generation: state.generation,
                        message: e.to_string(),
                    })
                    .await;
                return;
            }

            info!(
                "Recomputing: max_picks={}, prefix_len={}, included={:?}, excluded={:?}",
                params.max_picks, params.prefix_len, params.included, params.excluded
            );
            let generation = state.start_analysis(params.clone());
            let _ = ui_tx
                .send(UiUpdate::AnalysisStarted { generation, params })
                .await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Forward a finished analysis to the TUI unless it is stale.
async fn handle_analysis_event(
    state: &mut AppState,
    event: AnalysisEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    if event.generation != state.generation {
        debug!(
            "Discarding stale analysis result (event gen: {}, current gen: {})",
            event.generation, state.generation
        );
        return;
    }
    state.current_task = None;

    let update = match event.outcome {
        Ok(report) => {
            info!(
                "Analysis ready: {} ({} rows) in {:?}",
                report.header,
                report.rows.len(),
                event.elapsed
            );
            UiUpdate::AnalysisReady {
                generation: event.generation,
                report: Box::new(report),
                elapsed: event.elapsed,
            }
        }
        Err(message) => {
            warn!("Analysis failed: {}", message);
            UiUpdate::AnalysisFailed {
                generation: event.generation,
                message,
            }
        }
    };
    let _ = ui_tx.send(update).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
