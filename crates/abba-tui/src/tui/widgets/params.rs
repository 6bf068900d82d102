// Parameter panel: two sliders and two rank-list fields.
//
// Each input gets a bordered box; the focused one is highlighted. Sliders
// show the value with a proportional bar between their bounds.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ranks::{format_ranks, parse_ranks};
use crate::tui::{ParamField, ViewState};

/// Render the parameter column into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    for (i, field) in ParamField::ALL.iter().enumerate() {
        let focused = state.focus == *field;
        let lines = field_lines(state, *field, focused);
        let paragraph = Paragraph::new(lines).block(field_block(field.label(), focused));
        frame.render_widget(paragraph, sections[i]);
    }
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, title_style))
}

/// Content lines for one input box.
fn field_lines(state: &ViewState, field: ParamField, focused: bool) -> Vec<Line<'static>> {
    match field {
        ParamField::Picks => slider_lines(
            state.max_picks,
            state.bounds.min_picks,
            state.bounds.max_picks,
        ),
        ParamField::Prefix => slider_lines(state.prefix_len, 1, state.max_picks),
        ParamField::Included => text_lines(&state.included_text, focused),
        ParamField::Excluded => text_lines(&state.excluded_text, focused),
    }
}

fn slider_lines(value: usize, min: usize, max: usize) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                format!(" ◀ {:>2} ▶ ", value),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}..{}", min, max), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            format!(" {}", slider_bar(value, min, max, 24)),
            Style::default().fg(Color::Cyan),
        )),
    ]
}

fn text_lines(text: &str, focused: bool) -> Vec<Line<'static>> {
    let mut input = format!(" {}", text);
    if focused {
        input.push('▏');
    }
    let parsed = parse_ranks(text);
    let hint = if parsed.is_empty() {
        " (none)".to_string()
    } else {
        format!(" ranks: {}", format_ranks(&parsed))
    };
    vec![
        Line::from(Span::styled(input, Style::default().fg(Color::White))),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ]
}

/// Fixed-width bar with the filled share of `value` in `min..=max`.
pub fn slider_bar(value: usize, min: usize, max: usize, width: usize) -> String {
    let filled = if max <= min {
        width
    } else {
        let span = max - min;
        let pos = value.clamp(min, max) - min;
        (pos * width + span / 2) / span
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
