//! TUI Chess (workspace facade crate).
//!
//! Re-exports `tui_chess::{types,core,adapter,input,term}` from the dedicated
//! crates under `crates/`, plus the event-loop context ([`App`]) and the
//! client configuration used by the binary.

pub use tui_chess_adapter as adapter;
pub use tui_chess_core as core;
pub use tui_chess_input as input;
pub use tui_chess_term as term;
pub use tui_chess_types as types;

pub mod app;
pub mod config;

pub use app::App;
pub use config::ClientConfig;
