//! Adapter module - game server link over WebSocket with JSON messages
//!
//! The server is authoritative: the client sends commands and mirrors the
//! snapshots it receives. One connection per session, no reconnection.
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! Every command is an envelope `{"cmd": <name>, "arg": {...}}`:
//!
//! - **makemove**: `{"move": "e2e4Q"}` (square pair plus promotion letter)
//! - **resign**: `{}`
//! - **undo**: `{}`
//! - **start**: `{"colour": "white" | "black" | "random"}`
//!
//! ## Server → Client
//!
//! - **update**: full game snapshot (position, legal moves, turn, record)
//! - **error**: a command was rejected, with a human-readable message
//! - **okay**: acknowledgement, with a human-readable message
//!
//! # Environment Variables
//!
//! - `CHESS_SERVER_URL`: WebSocket endpoint (default: "ws://localhost:8080/socket/")
//! - `CHESS_EVENT_CAPACITY`: bound of the inbound event channel (default: 64)
//! - `CHESS_CONNECT_TIMEOUT_MS`: connect timeout in milliseconds (default: 5000)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"cmd":"start","arg":{"colour":"white"}}
//! Server -> Client: {"type":"update","message":"Started Game.","player_colour":"white","position":"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1","player_turn":true,"gameover":false,"moves":["e2e4",...],"last_move":"a1a1","wins":0,"losses":0,"draws":0}
//! Client -> Server: {"cmd":"makemove","arg":{"move":"e2e4Q"}}
//! Server -> Client: {"type":"update",...}
//! Client -> Server: {"cmd":"undo","arg":{}}
//! Server -> Client: {"type":"error","message":"Cannot undo."}
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** and **tokio-tungstenite** for the socket
//! - A single transport task owns the socket; the UI talks to it over channels
//! - [`ChessLink`] hosts the runtime so a sync loop can poll events

pub use tui_chess_core as core;
pub use tui_chess_types as types;

pub mod connection;
pub mod protocol;
pub mod runtime;

pub use connection::{
    on_message, Connection, ConnectionConfig, ConnectionError, ConnectionEvent, ReadyState,
};
pub use protocol::{encode_command, parse_message, ClientMessage, ProtocolError, ServerMessage};
pub use runtime::ChessLink;
