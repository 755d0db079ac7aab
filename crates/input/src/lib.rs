//! Terminal input module (controller-facing).
//!
//! Maps `crossterm` key and mouse events into [`UiAction`]s and keeps the
//! keyboard cursor used to tap squares without a mouse. Screen directions
//! are translated to board directions according to the board orientation.

pub mod cursor;
pub mod map;

pub use tui_chess_types as types;

pub use cursor::{BoardCursor, Direction};
pub use map::{handle_key_event, handle_mouse_event, should_quit, UiAction};
