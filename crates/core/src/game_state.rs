//! Game state module - the client's mirror of server-declared truth
//!
//! The server is authoritative. Each `update` event carries a complete
//! snapshot; [`apply_update`] decodes it into a fresh [`GameState`] that
//! replaces the previous one wholesale. Nothing here applies or predicts moves
//! locally.
//!
//! # Invariants
//!
//! - `board` is always a complete 64-slot board
//! - `legal_moves` is empty whenever `is_game_over` or `!is_local_turn`
//! - a failed decode produces an error and no state; callers keep the old one

use tracing::debug;

use crate::board::Board;
use crate::moves::LegalMoves;
use crate::notation::{decode_board, decode_move, decode_moves, NotationError};
use crate::types::{Colour, Move};

/// Decoded-but-unvalidated contents of a server `update` event.
///
/// This is the transport-independent form; the wire protocol converts into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerUpdate {
    pub message: String,
    pub position: String,
    pub moves: Vec<String>,
    pub player_colour: Option<Colour>,
    pub player_turn: bool,
    pub game_over: bool,
    pub last_move: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

/// Cumulative results for this session, as counted by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    legal_moves: LegalMoves,
    local_colour: Option<Colour>,
    is_game_over: bool,
    is_local_turn: bool,
    record: Record,
    last_move: Option<Move>,
    message: String,
}

impl GameState {
    /// The "no game" state used before the first update arrives.
    pub fn new() -> Self {
        Self {
            board: Board::empty(),
            legal_moves: LegalMoves::new(),
            local_colour: None,
            is_game_over: true,
            is_local_turn: false,
            record: Record::default(),
            last_move: None,
            message: String::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn legal_moves(&self) -> &LegalMoves {
        &self.legal_moves
    }

    pub fn local_colour(&self) -> Option<Colour> {
        self.local_colour
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn is_local_turn(&self) -> bool {
        self.is_local_turn
    }

    /// True when the local player may act on the board.
    pub fn accepts_input(&self) -> bool {
        self.is_local_turn && !self.is_game_over
    }

    pub fn record(&self) -> Record {
        self.record
    }

    pub fn wins(&self) -> u32 {
        self.record.wins
    }

    pub fn losses(&self) -> u32 {
        self.record.losses
    }

    pub fn draws(&self) -> u32 {
        self.record.draws
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Status text the server attached to the last update.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `CanMakeMove`: whether `mv` is legal for the local player right now.
    pub fn can_make_move(&self, mv: Move) -> bool {
        self.legal_moves.contains(mv.from, mv.to)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the next state from an authoritative update.
///
/// The result depends only on `update`; `previous` is consulted for logging.
/// On error the update must be discarded and `previous` kept as is.
pub fn apply_update(previous: &GameState, update: &ServerUpdate) -> Result<GameState, NotationError> {
    let board = decode_board(&update.position)?;
    let mut legal_moves = decode_moves(&update.moves)?;

    let is_game_over = update.game_over;
    let is_local_turn = update.player_turn;
    if (is_game_over || !is_local_turn) && !legal_moves.is_empty() {
        debug!(
            count = legal_moves.len(),
            game_over = is_game_over,
            local_turn = is_local_turn,
            "dropping legal moves offered outside the local turn"
        );
        legal_moves.clear();
    }

    let last_move = update.last_move.as_deref().and_then(|text| match decode_move(text) {
        Ok(mv) if mv.from != mv.to => Some(mv),
        Ok(_) => None,
        Err(err) => {
            debug!(%err, "ignoring undecodable last_move");
            None
        }
    });

    let next = GameState {
        board,
        legal_moves,
        local_colour: update.player_colour,
        is_game_over,
        is_local_turn,
        record: Record {
            wins: update.wins,
            losses: update.losses,
            draws: update.draws,
        },
        last_move,
        message: update.message.clone(),
    };

    if previous.is_game_over != next.is_game_over {
        debug!(
            game_over = next.is_game_over,
            colour = next.local_colour.map(|c| c.as_str()).unwrap_or("-"),
            "game status changed"
        );
    }

    Ok(next)
}
