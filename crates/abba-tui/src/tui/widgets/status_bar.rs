// Status bar widget: analysis state, current parameters, build timing.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::AnalysisStatus;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [status indicator] [parameters] [last build]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " ABBA Draft Explorer ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];

    let (label, color) = status_indicator(&state.status);
    spans.push(Span::styled(format!(" ● {} ", label), Style::default().fg(color)));

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("{} picks, prefix {}", state.max_picks, state.prefix_len),
        Style::default().fg(Color::White),
    ));

    if let Some(detail) = status_detail(state) {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(detail, Style::default().fg(Color::Gray)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the status label and its color.
pub fn status_indicator(status: &AnalysisStatus) -> (&'static str, Color) {
    match status {
        AnalysisStatus::Idle => ("Idle", Color::DarkGray),
        AnalysisStatus::Running => ("Computing", Color::Yellow),
        AnalysisStatus::Ready => ("Ready", Color::Green),
        AnalysisStatus::Failed(_) => ("Error", Color::Red),
    }
}

/// Extra text after the parameters: the failure message, or the size and
/// timing of the last build.
pub fn status_detail(state: &ViewState) -> Option<String> {
    if let AnalysisStatus::Failed(message) = &state.status {
        return Some(message.clone());
    }
    let report = state.report.as_ref()?;
    let elapsed = state.elapsed?;
    Some(format!(
        "{} combos in {} ms",
        report.combo_count,
        elapsed.as_millis()
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
