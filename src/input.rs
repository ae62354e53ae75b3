//! Key bindings: arrows and vim-style cursor movement.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Select the tile under the cursor, or swap with the selected one.
    Select,
    Deselect,
    Restart,
    Quit,
    None,
}

/// Map key event to game action. Supports both arrows and vim keys (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') => Action::Quit,
        KeyCode::Esc => Action::Deselect,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Select,
        _ => Action::None,
    }
}
