// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +------------------+-------------------------------+
// | Parameters (34)  | Summary header (3 rows)       |
// |                  +-------------------------------+
// |                  | Results table (fill)          |
// +------------------+-------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each explorer zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: analysis status and timing.
    pub status_bar: Rect,
    /// Left column: sliders and rank fields.
    pub params: Rect,
    /// Right column top: results header line.
    pub summary: Rect,
    /// Right column: prefix table.
    pub results: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Width of the parameter column.
const PARAMS_WIDTH: u16 = 34;

/// Build the explorer layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: params (fixed) | results (fill)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(PARAMS_WIDTH), Constraint::Min(20)])
        .split(middle);

    let params = horizontal[0];
    let right = horizontal[1];

    let right_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(right);

    AppLayout {
        status_bar,
        params,
        summary: right_sections[0],
        results: right_sections[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
