// Quit prompt, drawn over the prefix table while `ViewState::confirm_quit`
// is set.
//
// The box grows with its content: a build still in flight adds a line
// naming the generation that will be dropped on exit.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::protocol::AnalysisStatus;
use crate::tui::ViewState;

/// Render the prompt inside `anchor` (normally the results area).
pub fn render(frame: &mut Frame, anchor: Rect, state: &ViewState) {
    let lines = prompt_lines(state);
    let dialog = dialog_area(anchor, &lines);
    if dialog.width < 3 || dialog.height < 3 {
        return;
    }

    frame.render_widget(Clear, dialog);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Leave explorer ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(Color::Black)),
        dialog,
    );
}

fn prompt_lines(state: &ViewState) -> Vec<Line<'static>> {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let mut lines = vec![Line::from(vec![
        Span::raw(" Quit the explorer? ("),
        key("y", Color::Green),
        Span::raw("/"),
        key("n", Color::Red),
        Span::raw(") "),
    ])];

    match (&state.status, &state.report) {
        (AnalysisStatus::Running, _) => lines.push(Line::from(Span::styled(
            format!(" Build #{} is still running and will be dropped. ", state.generation),
            Style::default().fg(Color::Yellow),
        ))),
        (_, Some(report)) => lines.push(Line::from(Span::styled(
            format!(" Showing {} combos for {} picks. ", report.combo_count, state.max_picks),
            Style::default().fg(Color::DarkGray),
        ))),
        _ => {}
    }
    lines
}

/// Box sized to `lines` plus borders, centered in `anchor` and cut down to
/// fit inside it.
fn dialog_area(anchor: Rect, lines: &[Line]) -> Rect {
    let content_width = lines.iter().map(Line::width).max().unwrap_or(0);
    let width = u16::try_from(content_width + 2)
        .unwrap_or(u16::MAX)
        .min(anchor.width);
    let height = u16::try_from(lines.len() + 2)
        .unwrap_or(u16::MAX)
        .min(anchor.height);
    Rect {
        x: anchor.x + (anchor.width - width) / 2,
        y: anchor.y + (anchor.height - height) / 2,
        width,
        height,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
