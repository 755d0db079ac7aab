//! Key mapping from terminal events to UI actions.

use crate::cursor::Direction;
use crate::types::StartColour;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Move the keyboard cursor in screen space.
    Cursor(Direction),
    /// Tap the square under the cursor.
    Select,
    /// Drop the current selection.
    Cancel,
    Resign,
    Undo,
    Start(StartColour),
    CyclePromotion,
}

/// Map keyboard input to UI actions.
pub fn handle_key_event(key: KeyEvent) -> Option<UiAction> {
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(UiAction::Cursor(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(UiAction::Cursor(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(UiAction::Cursor(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(UiAction::Cursor(Direction::Down))
        }

        // Selection
        KeyCode::Enter | KeyCode::Char(' ') => Some(UiAction::Select),
        KeyCode::Esc => Some(UiAction::Cancel),

        // Game commands
        KeyCode::Char('w') | KeyCode::Char('W') => Some(UiAction::Start(StartColour::White)),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(UiAction::Start(StartColour::Black)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(UiAction::Start(StartColour::Random)),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(UiAction::Resign),
        KeyCode::Char('u') | KeyCode::Char('U') => Some(UiAction::Undo),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Tab => Some(UiAction::CyclePromotion),

        _ => None,
    }
}

/// Screen cell of a left-button press, if this event is one.
pub fn handle_mouse_event(event: MouseEvent) -> Option<(u16, u16)> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some((event.column, event.row)),
        _ => None,
    }
}

/// Check if key should quit the client.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
