// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the run
// loop (draft the selected player, quit), or into local ViewState
// mutations (selection, paging, filtering).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use draftpick_core::catalog::Position;

use super::{UserCommand, ViewState};

/// The ordered list of positions for cycling with the `p` key.
///
/// None -> QB -> RB -> WR -> TE -> K -> DST -> None
const POSITION_CYCLE: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Kicker,
    Position::Defense,
];

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should leave the view
/// (a draft or quit). Returns `None` when the key press was handled
/// locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release; act on Press only
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        // Selection
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(view_state, 1);
            None
        }

        // Paging
        KeyCode::PageUp | KeyCode::Left | KeyCode::Char('h') => {
            previous_page(view_state);
            None
        }
        KeyCode::PageDown | KeyCode::Right | KeyCode::Char('l') => {
            next_page(view_state);
            None
        }

        KeyCode::Char('/') => {
            view_state.filter_mode = true;
            None
        }

        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.position_filter = None;
            view_state.reset_paging();
            None
        }

        KeyCode::Char('p') => {
            cycle_position_filter(view_state);
            view_state.reset_paging();
            None
        }

        KeyCode::Enter | KeyCode::Char('d') => view_state
            .selected_player()
            .map(|p| UserCommand::Draft(p.id)),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// y/q confirm, n/Esc cancel, everything else is blocked.
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

/// Printable characters edit the filter; Enter keeps it, Esc clears it.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
            view_state.reset_paging();
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
            view_state.reset_paging();
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            view_state.reset_paging();
        }
        _ => {}
    }
    None
}

fn cycle_position_filter(view_state: &mut ViewState) {
    view_state.position_filter = match view_state.position_filter {
        None => Some(POSITION_CYCLE[0]),
        Some(current) => match POSITION_CYCLE.iter().position(|p| *p == current) {
            Some(i) if i + 1 < POSITION_CYCLE.len() => Some(POSITION_CYCLE[i + 1]),
            _ => None,
        },
    };
}

/// Move the selection through the filtered list, crossing page boundaries.
fn move_selection(view_state: &mut ViewState, delta: isize) {
    let total = view_state.filtered_players().len();
    if total == 0 {
        return;
    }
    let current = view_state.page * view_state.page_size + view_state.selected;
    let target = current
        .saturating_add_signed(delta)
        .min(total - 1);
    view_state.page = target / view_state.page_size;
    view_state.selected = target % view_state.page_size;
}

fn previous_page(view_state: &mut ViewState) {
    view_state.page = view_state.page.saturating_sub(1);
    view_state.selected = 0;
}

fn next_page(view_state: &mut ViewState) {
    if view_state.page + 1 < view_state.page_count() {
        view_state.page += 1;
        view_state.selected = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
