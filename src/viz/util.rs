use crossterm::event::{Event, KeyCode, KeyEventKind};

use crate::gym::Action;

/// Takes an event, checks if it is a key press event, and returns the [`KeyCode`]
pub(super) fn event_keycode(event: &Event) -> Option<KeyCode> {
    let Event::Key(key) = event else {
        return None;
    };

    if key.kind != KeyEventKind::Press {
        return None;
    }

    Some(key.code)
}

/// Arrow keys and `wasd` map onto moves
pub(super) fn keycode_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Char('a') => Some(Action::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Action::Right),
        KeyCode::Up | KeyCode::Char('w') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Action::Down),
        _ => None,
    }
}
