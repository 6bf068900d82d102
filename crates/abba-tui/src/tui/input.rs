// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into local ViewState mutations (focus,
// slider moves, rank edits, scrolling) and, whenever the analysis inputs
// change, into a `Recompute` command for the app orchestrator.

use abba_core::AnalysisParams;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{ParamField, ViewState};
use crate::protocol::UserCommand;

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 20;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (a parameter changed, or quit). Returns `None` when the
/// key press was handled locally or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.focus.is_text() {
        if let Some(cmd) = handle_text_edit(key_event, view_state) {
            return cmd;
        }
    }

    match key_event.code {
        // Focus
        KeyCode::Tab => {
            view_state.focus = view_state.focus.next();
            None
        }
        KeyCode::BackTab => {
            view_state.focus = view_state.focus.prev();
            None
        }

        // Sliders
        KeyCode::Left | KeyCode::Char('-') => adjust_slider(view_state, -1),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
            adjust_slider(view_state, 1)
        }

        // Results scrolling
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, PAGE_SIZE);
            None
        }
        KeyCode::Home => {
            view_state.scroll_offset = 0;
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels
/// - All other keys are blocked
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Edit the focused rank field.
///
/// Digits, commas and spaces are typed into the field, Backspace deletes,
/// Esc clears. Returns `None` for keys that are not edits so normal-mode
/// handling can take over; otherwise `Some(result)` where `result` carries a
/// `Recompute` only when the parsed ranks actually changed.
fn handle_text_edit(
    key_event: KeyEvent,
    view_state: &mut ViewState,
) -> Option<Option<UserCommand>> {
    let before = view_state.current_params();
    let text = view_state.focused_text_mut()?;
    match key_event.code {
        KeyCode::Char(c) if c.is_ascii_digit() || c == ',' || c == ' ' => text.push(c),
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Esc => text.clear(),
        _ => return None,
    }
    Some(recompute_if_changed(view_state, before))
}

/// Move the focused slider by `delta` steps.
fn adjust_slider(view_state: &mut ViewState, delta: isize) -> Option<UserCommand> {
    let before = view_state.current_params();
    match view_state.focus {
        ParamField::Picks => {
            let target = view_state.max_picks.saturating_add_signed(delta);
            view_state.set_max_picks(target);
        }
        ParamField::Prefix => {
            let target = view_state.prefix_len.saturating_add_signed(delta);
            view_state.set_prefix_len(target);
        }
        ParamField::Included | ParamField::Excluded => return None,
    }
    recompute_if_changed(view_state, before)
}

fn recompute_if_changed(
    view_state: &ViewState,
    before: AnalysisParams,
) -> Option<UserCommand> {
    let after = view_state.current_params();
    (after != before).then_some(UserCommand::Recompute(after))
}

/// Scroll up by the given number of rows.
fn scroll_up(view_state: &mut ViewState, rows: usize) {
    view_state.scroll_offset = view_state.scroll_offset.saturating_sub(rows);
}

/// Scroll down by the given number of rows, stopping at the last row.
fn scroll_down(view_state: &mut ViewState, rows: usize) {
    let max_offset = view_state.row_count().saturating_sub(1);
    view_state.scroll_offset = view_state.scroll_offset.saturating_add(rows).min(max_offset);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use abba_core::run_analysis_report;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    /// Helper to create a KeyEvent with no modifiers.
    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Helper to create a KeyEvent with Ctrl modifier.
    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn recompute_params(cmd: Option<UserCommand>) -> AnalysisParams {
        match cmd {
            Some(UserCommand::Recompute(params)) => params,
            other => panic!("expected Recompute, got {other:?}"),
        }
    }

    /// State with a loaded report so scrolling has rows to move over.
    fn state_with_rows() -> ViewState {
        let mut state = ViewState::default();
        state.report = Some(run_analysis_report(&state.current_params()));
        state
    }

    // -- Focus --

    #[test]
    fn tab_cycles_focus() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Tab), &mut state).is_none());
        assert_eq!(state.focus, ParamField::Prefix);
        handle_key(key(KeyCode::Tab), &mut state);
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.focus, ParamField::Excluded);
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.focus, ParamField::Picks);
    }

    #[test]
    fn back_tab_cycles_backwards() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::BackTab), &mut state);
        assert_eq!(state.focus, ParamField::Excluded);
    }

    // -- Sliders --

    #[test]
    fn right_arrow_raises_picks_and_recomputes() {
        let mut state = ViewState::default();
        let params = recompute_params(handle_key(key(KeyCode::Right), &mut state));
        assert_eq!(params.max_picks, 9);
        assert_eq!(state.max_picks, 9);
    }

    #[test]
    fn minus_lowers_prefix() {
        let mut state = ViewState::default();
        state.focus = ParamField::Prefix;
        let params = recompute_params(handle_key(key(KeyCode::Char('-')), &mut state));
        assert_eq!(params.prefix_len, 3);
    }

    #[test]
    fn slider_at_limit_sends_nothing() {
        let mut state = ViewState::default();
        state.max_picks = 12;
        assert!(handle_key(key(KeyCode::Char('+')), &mut state).is_none());
        assert_eq!(state.max_picks, 12);

        state.focus = ParamField::Prefix;
        state.prefix_len = 1;
        assert!(handle_key(key(KeyCode::Left), &mut state).is_none());
        assert_eq!(state.prefix_len, 1);
    }

    #[test]
    fn lowering_picks_below_prefix_drags_prefix_down() {
        let mut state = ViewState::default();
        state.max_picks = 4;
        state.prefix_len = 4;
        let params = recompute_params(handle_key(key(KeyCode::Left), &mut state));
        assert_eq!((params.max_picks, params.prefix_len), (3, 3));
    }

    // -- Rank fields --

    #[test]
    fn typing_ranks_recomputes_with_parsed_list() {
        let mut state = ViewState::default();
        state.focus = ParamField::Included;
        let params = recompute_params(handle_key(key(KeyCode::Char('2')), &mut state));
        assert_eq!(params.included, vec![2]);
        assert_eq!(state.included_text, "2");
    }

    #[test]
    fn separator_alone_does_not_recompute() {
        let mut state = ViewState::default();
        state.focus = ParamField::Excluded;
        state.excluded_text = "3".into();
        assert!(handle_key(key(KeyCode::Char(',')), &mut state).is_none());
        assert_eq!(state.excluded_text, "3,");
        let params = recompute_params(handle_key(key(KeyCode::Char('5')), &mut state));
        assert_eq!(params.excluded, vec![3, 5]);
    }

    #[test]
    fn backspace_and_esc_edit_the_field() {
        let mut state = ViewState::default();
        state.focus = ParamField::Included;
        state.included_text = "1, 4".into();
        let params = recompute_params(handle_key(key(KeyCode::Backspace), &mut state));
        assert_eq!(params.included, vec![1]);
        let params = recompute_params(handle_key(key(KeyCode::Esc), &mut state));
        assert!(params.included.is_empty());
        assert!(state.included_text.is_empty());
    }

    #[test]
    fn letters_are_not_typed_into_rank_fields() {
        let mut state = ViewState::default();
        state.focus = ParamField::Included;
        handle_key(key(KeyCode::Char('x')), &mut state);
        assert!(state.included_text.is_empty());
        // `q` still opens the quit dialog from a text field.
        handle_key(key(KeyCode::Char('q')), &mut state);
        assert!(state.confirm_quit);
    }

    #[test]
    fn arrows_do_not_touch_sliders_from_text_fields() {
        let mut state = ViewState::default();
        state.focus = ParamField::Included;
        assert!(handle_key(key(KeyCode::Right), &mut state).is_none());
        assert_eq!(state.max_picks, 8);
    }

    // -- Scroll --

    #[test]
    fn arrow_down_and_up_scroll_results() {
        let mut state = state_with_rows();
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.scroll_offset, 2);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.scroll_offset, 1);
    }

    #[test]
    fn scroll_up_does_not_underflow() {
        let mut state = state_with_rows();
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn page_down_stops_at_last_row() {
        let mut state = state_with_rows();
        let rows = state.row_count();
        for _ in 0..rows {
            handle_key(key(KeyCode::PageDown), &mut state);
        }
        assert_eq!(state.scroll_offset, rows - 1);
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll_offset, (rows - 1).saturating_sub(PAGE_SIZE));
    }

    #[test]
    fn scroll_without_report_stays_at_top() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.scroll_offset, 0);
    }

    // -- Quit --

    #[test]
    fn q_enters_confirm_mode() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm_quit);
    }

    #[test]
    fn confirm_mode_y_quits() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn confirm_mode_esc_cancels_and_blocks_other_keys() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert!(handle_key(key(KeyCode::Right), &mut state).is_none());
        assert_eq!(state.max_picks, 8);
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.confirm_quit);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut state = ViewState::default();
        state.focus = ParamField::Excluded;
        state.confirm_quit = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Right);
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
        assert_eq!(state.max_picks, 8);
    }
}
