// TUI explorer: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the parameter inputs and the latest
// analysis report. Parameter edits are sent to the app orchestrator as
// `Recompute` commands; the orchestrator pushes `UiUpdate` messages back
// over an mpsc channel, which are applied to `ViewState` before the next
// render tick (~30 fps).

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use abba_core::{AnalysisParams, AnalysisReport};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::{Config, PickBounds};
use crate::protocol::{AnalysisStatus, UiUpdate, UserCommand};
use crate::ranks::parse_ranks;

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ParamField
// ---------------------------------------------------------------------------

/// Parameter input that currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamField {
    Picks,
    Prefix,
    Included,
    Excluded,
}

impl ParamField {
    pub const ALL: [ParamField; 4] = [
        ParamField::Picks,
        ParamField::Prefix,
        ParamField::Included,
        ParamField::Excluded,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ParamField::Picks => "Territories considered",
            ParamField::Prefix => "Prefix length",
            ParamField::Included => "Included (ours)",
            ParamField::Excluded => "Excluded (lost)",
        }
    }

    /// Whether the field is a free-form rank list rather than a slider.
    pub fn is_text(&self) -> bool {
        matches!(self, ParamField::Included | ParamField::Excluded)
    }

    pub fn next(&self) -> ParamField {
        let i = self.index();
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> ParamField {
        let i = self.index();
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: parameter inputs plus the most recent analysis.
///
/// Updated by key handling (inputs) and by `UiUpdate` messages from the app
/// orchestrator (results). `render_frame` reads this struct to draw.
pub struct ViewState {
    pub max_picks: usize,
    pub prefix_len: usize,
    /// Raw text of the included ranks field.
    pub included_text: String,
    /// Raw text of the excluded ranks field.
    pub excluded_text: String,
    pub focus: ParamField,
    /// Allowed range of the picks slider.
    pub bounds: PickBounds,
    /// Latest report accepted from the orchestrator.
    pub report: Option<AnalysisReport>,
    pub status: AnalysisStatus,
    /// Generation of the newest request the TUI has heard about.
    pub generation: u64,
    /// Wall time of the build behind `report`.
    pub elapsed: Option<Duration>,
    /// First visible row of the results table.
    pub scroll_offset: usize,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::from_config(&Config::default())
    }
}

impl ViewState {
    /// Seed the inputs from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let bounds = config.bounds;
        let max_picks = bounds.clamp(config.analysis.max_picks);
        ViewState {
            max_picks,
            prefix_len: config.analysis.prefix_len.max(1).min(max_picks),
            included_text: config.analysis.included.clone(),
            excluded_text: config.analysis.excluded.clone(),
            focus: ParamField::Picks,
            bounds,
            report: None,
            status: AnalysisStatus::Idle,
            generation: 0,
            elapsed: None,
            scroll_offset: 0,
            confirm_quit: false,
        }
    }

    /// Parameters described by the current inputs.
    pub fn current_params(&self) -> AnalysisParams {
        AnalysisParams::new(self.max_picks, self.prefix_len)
            .with_included(parse_ranks(&self.included_text))
            .with_excluded(parse_ranks(&self.excluded_text))
    }

    /// Set the picks slider, keeping the prefix slider within range.
    ///
    /// Returns `true` if anything changed.
    pub fn set_max_picks(&mut self, picks: usize) -> bool {
        let picks = self.bounds.clamp(picks);
        if picks == self.max_picks {
            return false;
        }
        self.max_picks = picks;
        self.prefix_len = self.prefix_len.min(picks);
        true
    }

    /// Set the prefix slider within `1..=max_picks`.
    ///
    /// Returns `true` if the value changed.
    pub fn set_prefix_len(&mut self, len: usize) -> bool {
        let len = len.clamp(1, self.max_picks);
        if len == self.prefix_len {
            return false;
        }
        self.prefix_len = len;
        true
    }

    /// Text buffer behind the focused field, if it is a text field.
    pub fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            ParamField::Included => Some(&mut self.included_text),
            ParamField::Excluded => Some(&mut self.excluded_text),
            ParamField::Picks | ParamField::Prefix => None,
        }
    }

    /// Number of rows in the current report.
    pub fn row_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.rows.len())
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::AnalysisStarted { generation, .. } => {
            if generation >= state.generation {
                state.generation = generation;
                state.status = AnalysisStatus::Running;
            }
        }
        UiUpdate::AnalysisReady {
            generation,
            report,
            elapsed,
        } => {
            if generation < state.generation {
                debug!("Ignoring outdated report (gen {})", generation);
                return;
            }
            state.generation = generation;
            state.report = Some(*report);
            state.elapsed = Some(elapsed);
            state.status = AnalysisStatus::Ready;
            state.scroll_offset = 0;
        }
        UiUpdate::AnalysisFailed {
            generation,
            message,
        } => {
            if generation >= state.generation {
                state.generation = generation;
                state.status = AnalysisStatus::Failed(message);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete explorer frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::params::render(frame, layout.params, state);
    widgets::results::render_summary(frame, layout.summary, state);
    widgets::results::render(frame, layout.results, state);
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, layout.results, state);
    }
}

/// Keyboard hints for the current focus.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.focus.is_text() {
        " Tab:Next field | 0-9 , :Edit ranks | Bksp:Delete | Up/Down:Scroll | q:Quit"
    } else {
        " Tab:Next field | Left/Right or -/+:Adjust | Up/Down/PgUp/PgDn:Scroll | q:Quit"
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Requests the initial analysis for the configured parameters.
/// 4. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 5. Restores the terminal on clean exit.
pub async fn run(
    config: &Config,
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Restore the terminal before the original hook prints the panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Initial analysis
    let mut view_state = ViewState::from_config(config);
    let _ = cmd_tx
        .send(UserCommand::Recompute(view_state.current_params()))
        .await;

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 4. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        info!("UI channel closed, leaving TUI");
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quitting = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quitting {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws.
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 5. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
