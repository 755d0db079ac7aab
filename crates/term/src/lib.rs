//! Terminal "board renderer" module.
//!
//! A small rendering layer for a terminal chess board. It avoids widget
//! toolkits and renders into a plain framebuffer that is flushed to the
//! terminal with run-length diffs.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Map screen cells back to squares so clicks and keys share one path
//! - Control aspect ratio precisely (3 columns per square by default)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_chess_core as core;
pub use tui_chess_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{bottom_colour, GameView, LinkStatusView, Scene, Viewport};
pub use renderer::{encode_frame, TerminalRenderer};
