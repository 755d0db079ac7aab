//! Core client logic module - pure, deterministic, and testable
//!
//! This module contains everything the client knows about a game. It has
//! **no dependencies** on terminal, networking, or I/O, making it:
//!
//! - **Authoritative-mirroring**: state only ever comes from server updates
//! - **Testable**: every transition is a plain function call
//! - **Portable**: usable behind any transport or front end
//!
//! # Module Structure
//!
//! - [`notation`]: placement-string and square-pair codec
//! - [`board`]: immutable 64-slot board
//! - [`moves`]: bounded legal-move set (`CanMakeMove`)
//! - [`game_state`]: the mirrored game state and the update reducer
//! - [`interaction`]: selection state machine and outgoing commands
//! - [`session`]: owns state + controller for a single event loop
//!
//! # Data Flow
//!
//! ```text
//! server update -> notation -> apply_update -> GameState (swapped whole)
//! user tap -> InteractionController -> Command -> CommandSink -> server
//! ```
//!
//! # Example
//!
//! ```
//! use tui_chess_core::{Command, ServerUpdate, Session};
//! use tui_chess_core::types::{Colour, Square};
//!
//! let mut session = Session::new();
//! session
//!     .apply_update(&ServerUpdate {
//!         position: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".into(),
//!         moves: vec!["e2e4".into()],
//!         player_colour: Some(Colour::White),
//!         player_turn: true,
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let mut sent: Vec<Command> = Vec::new();
//! session.tap(Square::parse("e2").unwrap(), &mut sent);
//! session.tap(Square::parse("e4").unwrap(), &mut sent);
//! assert_eq!(sent, vec![Command::MakeMove("e2e4Q".into())]);
//! ```

pub mod board;
pub mod game_state;
pub mod interaction;
pub mod moves;
pub mod notation;
pub mod session;

pub use tui_chess_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{apply_update, GameState, Record, ServerUpdate};
pub use interaction::{Command, CommandSink, InteractionController, Selection};
pub use moves::LegalMoves;
pub use notation::{decode_board, decode_move, decode_moves, encode_board, encode_move, NotationError};
pub use session::{Notice, NoticeKind, Session};
