// Integration tests for the explorer.
//
// These drive the real orchestrator over channels with key events fed
// through the input handler, the same path the terminal loop takes, and
// check what ends up in the view state and on a test backend.

use std::path::{Path, PathBuf};

use abba_core::Feasibility;
use abba_tui::app::{self, AppState};
use abba_tui::config::{ensure_config_files, load_config_from, Config};
use abba_tui::protocol::{AnalysisStatus, UiUpdate, UserCommand};
use abba_tui::tui::{apply_ui_update, input, render_frame, ParamField, ViewState};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use tokio::sync::mpsc;

// ===========================================================================
// Test helpers
// ===========================================================================

struct Harness {
    view: ViewState,
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    app: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(config: &Config) -> Self {
        let (analysis_tx, analysis_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (ui_tx, ui_rx) = mpsc::channel(64);
        let app = tokio::spawn(app::run(
            analysis_rx,
            cmd_rx,
            ui_tx,
            AppState::new(analysis_tx),
        ));
        Harness {
            view: ViewState::from_config(config),
            cmd_tx,
            ui_rx,
            app,
        }
    }

    /// Send the command for the current inputs, as the TUI does at startup.
    async fn recompute(&mut self) {
        let params = self.view.current_params();
        self.cmd_tx
            .send(UserCommand::Recompute(params))
            .await
            .unwrap();
        self.settle().await;
    }

    /// Feed a key press; if it produced a command, forward it and wait for
    /// the resulting analysis.
    async fn press(&mut self, code: KeyCode) -> bool {
        let event = KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        match input::handle_key(event, &mut self.view) {
            Some(UserCommand::Quit) => {
                self.cmd_tx.send(UserCommand::Quit).await.unwrap();
                true
            }
            Some(cmd) => {
                self.cmd_tx.send(cmd).await.unwrap();
                self.settle().await;
                true
            }
            None => false,
        }
    }

    /// Apply updates until the latest request has finished.
    async fn settle(&mut self) {
        loop {
            let update = self.ui_rx.recv().await.expect("orchestrator hung up");
            let finished = matches!(
                update,
                UiUpdate::AnalysisReady { .. } | UiUpdate::AnalysisFailed { .. }
            );
            apply_ui_update(&mut self.view, update);
            if finished {
                return;
            }
        }
    }

    async fn quit(self) {
        drop(self.cmd_tx);
        self.app.await.unwrap().unwrap();
    }
}

/// Fresh base directory holding `defaults/` copied from the crate.
fn temp_base(name: &str) -> PathBuf {
    let base = std::env::temp_dir().join(format!("abba_flow_test_{name}"));
    let _ = std::fs::remove_dir_all(&base);
    std::fs::create_dir_all(base.join("defaults")).unwrap();
    let crate_defaults = Path::new(env!("CARGO_MANIFEST_DIR")).join("defaults");
    for file in ["explorer.toml", "explorer.toml.example"] {
        std::fs::copy(crate_defaults.join(file), base.join("defaults").join(file)).unwrap();
    }
    base
}

// ===========================================================================
// Startup
// ===========================================================================

#[tokio::test]
async fn default_config_produces_initial_report() {
    let base = temp_base("startup");
    let copied = ensure_config_files(&base).unwrap();
    assert_eq!(copied.len(), 1, "only explorer.toml is copied");
    let config = load_config_from(&base).unwrap();

    let mut h = Harness::start(&config);
    h.recompute().await;

    assert_eq!(h.view.status, AnalysisStatus::Ready);
    let report = h.view.report.as_ref().unwrap();
    assert_eq!(report.combo_count, 3182);
    assert_eq!(report.header, "3182 unique final combos after filters");
    assert!(report.rows.iter().all(|r| r.prefix.len() == 4));

    h.quit().await;
    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn example_config_applies_rank_filters() {
    let base = temp_base("example");
    std::fs::create_dir_all(base.join("config")).unwrap();
    std::fs::copy(
        base.join("defaults").join("explorer.toml.example"),
        base.join("config").join("explorer.toml"),
    )
    .unwrap();
    let config = load_config_from(&base).unwrap();

    let mut h = Harness::start(&config);
    h.recompute().await;

    let report = h.view.report.as_ref().unwrap();
    assert_eq!(report.combo_count, 8);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].prefix, vec![1, 2]);
    assert_eq!(report.rows[0].percent, "100.0");
    assert_eq!(report.rows[0].feasibility, Feasibility::Both);

    h.quit().await;
    let _ = std::fs::remove_dir_all(&base);
}

// ===========================================================================
// Interaction
// ===========================================================================

#[tokio::test]
async fn sliders_and_rank_fields_drive_recomputation() {
    let mut config = Config::default();
    config.analysis.max_picks = 4;
    config.analysis.prefix_len = 2;
    let mut h = Harness::start(&config);
    h.recompute().await;
    let totals: Vec<usize> = h.view.report.as_ref().unwrap().rows.iter().map(|r| r.total).collect();
    assert_eq!(totals, vec![13, 8, 3, 6]);

    // Picks slider down to 3.
    assert!(h.press(KeyCode::Left).await);
    assert_eq!(h.view.report.as_ref().unwrap().combo_count, 11);

    // Prefix slider down to 1.
    h.press(KeyCode::Tab).await;
    assert_eq!(h.view.focus, ParamField::Prefix);
    assert!(h.press(KeyCode::Char('-')).await);
    let rows = &h.view.report.as_ref().unwrap().rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].percent, "72.7");
    assert_eq!(rows[1].feasibility, Feasibility::Second);

    // Exclude rank 1: only the second role remains.
    h.press(KeyCode::Tab).await;
    h.press(KeyCode::Tab).await;
    assert_eq!(h.view.focus, ParamField::Excluded);
    assert!(h.press(KeyCode::Char('1')).await);
    let report = h.view.report.as_ref().unwrap();
    assert_eq!(report.combo_count, 3);
    assert!(report.rows.iter().all(|r| r.feasibility == Feasibility::Second));

    // Excluding rank 2 as well leaves nothing.
    assert!(!h.press(KeyCode::Char(',')).await);
    assert!(h.press(KeyCode::Char('2')).await);
    let report = h.view.report.as_ref().unwrap();
    assert!(report.is_empty());
    assert_eq!(report.header, "No valid combinations");

    h.quit().await;
}

#[tokio::test]
async fn quit_confirmation_stops_the_orchestrator() {
    let mut h = Harness::start(&Config::default());
    assert!(!h.press(KeyCode::Char('q')).await);
    assert!(h.view.confirm_quit);
    assert!(h.press(KeyCode::Char('y')).await);
    // The orchestrator exits on Quit even with the sender still alive.
    h.app.await.unwrap().unwrap();
}

#[tokio::test]
async fn rendered_frame_reflects_latest_report() {
    let mut config = Config::default();
    config.analysis.max_picks = 3;
    config.analysis.prefix_len = 2;
    let mut h = Harness::start(&config);
    h.recompute().await;

    let backend = ratatui::backend::TestBackend::new(110, 30);
    let mut terminal = ratatui::Terminal::new(backend).unwrap();
    terminal.draw(|frame| render_frame(frame, &h.view)).unwrap();
    let text: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(text.contains("11 unique final combos after filters"));
    assert!(text.contains("(1, 4)"));
    assert!(text.contains("Ready"));

    h.quit().await;
}
