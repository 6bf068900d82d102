// Results widgets: the summary header and the prefix table.
//
// Table columns: Prefix, Count, Percent, Possible. Rows above
// `ViewState::scroll_offset` are skipped. An empty report shows a warning
// instead of the table.

use abba_core::{Feasibility, PrefixRow};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::protocol::AnalysisStatus;
use crate::tui::ViewState;

/// Shown in place of the table when no prefix rows survive.
pub const EMPTY_WARNING: &str = "No sequences with these filters.";

/// Render the header line of the current report.
pub fn render_summary(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match (&state.report, &state.status) {
        (Some(report), _) => Line::from(Span::styled(
            format!(" {}", report.header),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        (None, AnalysisStatus::Failed(message)) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Red),
        )),
        (None, _) => Line::from(Span::styled(
            " Computing...",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let paragraph =
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Summary"));
    frame.render_widget(paragraph, area);
}

/// Render the prefix table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(build_title(state));

    let Some(report) = &state.report else {
        frame.render_widget(block, area);
        return;
    };

    if report.rows.is_empty() {
        let warning = Paragraph::new(Line::from(Span::styled(
            format!(" {}", EMPTY_WARNING),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .block(block);
        frame.render_widget(warning, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Prefix"),
        Cell::from("Count"),
        Cell::from("Percent"),
        Cell::from("Possible"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let offset = state.scroll_offset.min(report.rows.len().saturating_sub(1));
    let rows: Vec<Row> = report.rows[offset..].iter().map(table_row).collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn table_row(row: &PrefixRow) -> Row<'static> {
    Row::new(vec![
        Cell::from(row.prefix_label()),
        Cell::from(format!("{:>5}", row.total)),
        Cell::from(format!("{:>6}", row.percent)),
        Cell::from(Span::styled(
            row.feasibility.label(),
            Style::default().fg(feasibility_color(row.feasibility)),
        )),
    ])
}

/// Color for the "Possible" column.
pub fn feasibility_color(feasibility: Feasibility) -> Color {
    match feasibility {
        Feasibility::Both => Color::Green,
        Feasibility::First => Color::Cyan,
        Feasibility::Second => Color::Magenta,
    }
}

/// Title with the visible row window, e.g. "Prefixes (3-24 of 24)".
fn build_title(state: &ViewState) -> Line<'static> {
    let count = state.row_count();
    if count == 0 {
        return Line::from("Prefixes");
    }
    let first = state.scroll_offset.min(count - 1) + 1;
    Line::from(format!("Prefixes ({}-{} of {})", first, count, count))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
