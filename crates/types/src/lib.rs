//! Core types module - shared value types and constants
//!
//! This module defines the fundamental types used throughout the client.
//! All types are plain `Copy` data with no external dependencies, so they can
//! be used anywhere (codec, reducer, UI rendering, wire protocol).
//!
//! # Board Geometry
//!
//! - **Files**: 8 columns, `0` = file a, `7` = file h
//! - **Ranks**: 8 rows, `0` = rank 1 (nearest White), `7` = rank 8
//! - **Index**: `rank * 8 + file`, so a1 = 0, h1 = 7, a8 = 56, h8 = 63
//!
//! # Wire Letters
//!
//! | Type | Letters |
//! |------|---------|
//! | `Piece` | `PNBRQK` white, `pnbrqk` black (placement strings) |
//! | `Promotion` | `N`, `B`, `R`, `Q` (appended to move commands) |
//! | `StartColour` | `"white"`, `"black"`, `"random"` |
//!
//! # Examples
//!
//! ```
//! use tui_chess_types::{Colour, Move, Piece, PieceKind, Square};
//!
//! let e2 = Square::parse("e2").unwrap();
//! assert_eq!((e2.file(), e2.rank()), (4, 1));
//! assert_eq!(e2.index(), 12);
//!
//! let mv = Move::new(e2, Square::parse("e4").unwrap());
//! assert_eq!(mv.to_string(), "e2e4");
//!
//! let rook = Piece::from_fen_char('r').unwrap();
//! assert_eq!(rook, Piece::new(PieceKind::Rook, Colour::Black));
//! ```

use std::fmt;

/// Number of files on the board
pub const BOARD_FILES: u8 = 8;

/// Number of ranks on the board
pub const BOARD_RANKS: u8 = 8;

/// Number of squares on the board
pub const BOARD_SQUARES: usize = 64;

/// Upper bound on the number of legal moves held for one position.
///
/// The largest known legal-move count for a reachable chess position is 218.
pub const MAX_LEGAL_MOVES: usize = 256;

/// Default game server endpoint
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8080/socket/";

/// Input poll interval of the terminal loop in milliseconds
pub const DEFAULT_TICK_MS: u64 = 50;

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    White,
    Black,
}

impl Colour {
    /// Parse colour name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_chess_types::Colour;
    ///
    /// assert_eq!(Colour::from_str("White"), Some(Colour::White));
    /// assert_eq!(Colour::from_str("black"), Some(Colour::Black));
    /// assert_eq!(Colour::from_str("red"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("white") {
            Some(Colour::White)
        } else if s.eq_ignore_ascii_case("black") {
            Some(Colour::Black)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Colour::White => "white",
            Colour::Black => "black",
        }
    }
}

/// The six chess piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Uppercase placement letter
    pub fn letter(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parse a placement letter, ignoring case
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A coloured piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}

impl Piece {
    pub const fn new(kind: PieceKind, colour: Colour) -> Self {
        Self { kind, colour }
    }

    /// Parse a placement-string letter: uppercase is White, lowercase is Black.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_chess_types::{Colour, Piece, PieceKind};
    ///
    /// assert_eq!(Piece::from_fen_char('K'), Some(Piece::new(PieceKind::King, Colour::White)));
    /// assert_eq!(Piece::from_fen_char('n'), Some(Piece::new(PieceKind::Knight, Colour::Black)));
    /// assert_eq!(Piece::from_fen_char('x'), None);
    /// ```
    pub fn from_fen_char(c: char) -> Option<Self> {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let kind = PieceKind::from_letter(c)?;
        let colour = if c.is_ascii_uppercase() {
            Colour::White
        } else {
            Colour::Black
        };
        Some(Self { kind, colour })
    }

    pub fn fen_char(&self) -> char {
        let c = self.kind.letter();
        match self.colour {
            Colour::White => c,
            Colour::Black => c.to_ascii_lowercase(),
        }
    }

    /// Unicode chess glyph
    pub fn glyph(&self) -> char {
        match (self.colour, self.kind) {
            (Colour::White, PieceKind::Pawn) => '♙',
            (Colour::White, PieceKind::Knight) => '♘',
            (Colour::White, PieceKind::Bishop) => '♗',
            (Colour::White, PieceKind::Rook) => '♖',
            (Colour::White, PieceKind::Queen) => '♕',
            (Colour::White, PieceKind::King) => '♔',
            (Colour::Black, PieceKind::Pawn) => '♟',
            (Colour::Black, PieceKind::Knight) => '♞',
            (Colour::Black, PieceKind::Bishop) => '♝',
            (Colour::Black, PieceKind::Rook) => '♜',
            (Colour::Black, PieceKind::Queen) => '♛',
            (Colour::Black, PieceKind::King) => '♚',
        }
    }
}

/// A board slot
///
/// - `None`: Empty square (no colour)
/// - `Some(Piece)`: Square occupied by the given piece
pub type Cell = Option<Piece>;

/// A board square. Both coordinates are always in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Build a square, returning `None` when either coordinate is off the board.
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_FILES && rank < BOARD_RANKS {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SQUARES {
            Some(Self {
                file: (index % 8) as u8,
                rank: (index / 8) as u8,
            })
        } else {
            None
        }
    }

    pub const fn file(&self) -> u8 {
        self.file
    }

    pub const fn rank(&self) -> u8 {
        self.rank
    }

    pub const fn index(&self) -> usize {
        (self.rank as usize) * 8 + self.file as usize
    }

    /// Parse algebraic square text like `"e4"` (lowercase file letter).
    pub fn parse(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() != 2 {
            return None;
        }
        Self::from_ascii(b[0], b[1])
    }

    /// Decode a file letter and rank digit pair.
    pub fn from_ascii(file: u8, rank: u8) -> Option<Self> {
        let f = file.checked_sub(b'a')?;
        let r = rank.checked_sub(b'1')?;
        Self::new(f, r)
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(&self) -> char {
        (b'1' + self.rank) as char
    }

    /// Light squares are those where file and rank parity differ (a1 is dark).
    pub fn is_light(&self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    /// Step by a file/rank offset, staying on the board.
    pub fn offset(&self, df: i8, dr: i8) -> Option<Self> {
        let f = self.file as i8 + df;
        let r = self.rank as i8 + dr;
        if f < 0 || r < 0 {
            return None;
        }
        Self::new(f as u8, r as u8)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// A source/destination pair. Promotion is carried separately at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Pieces a pawn may promote to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Promotion {
    Knight,
    Bishop,
    Rook,
    #[default]
    Queen,
}

impl Promotion {
    /// Letter appended to `makemove` commands
    pub fn letter(&self) -> char {
        match self {
            Promotion::Knight => 'N',
            Promotion::Bishop => 'B',
            Promotion::Rook => 'R',
            Promotion::Queen => 'Q',
        }
    }

    /// Next choice in selector order (queen, rook, bishop, knight)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_chess_types::Promotion;
    ///
    /// assert_eq!(Promotion::Queen.cycle(), Promotion::Rook);
    /// assert_eq!(Promotion::Knight.cycle(), Promotion::Queen);
    /// ```
    pub fn cycle(&self) -> Self {
        match self {
            Promotion::Queen => Promotion::Rook,
            Promotion::Rook => Promotion::Bishop,
            Promotion::Bishop => Promotion::Knight,
            Promotion::Knight => Promotion::Queen,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Promotion::Knight => "knight",
            Promotion::Bishop => "bishop",
            Promotion::Rook => "rook",
            Promotion::Queen => "queen",
        }
    }
}

/// Side requested when starting a new game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartColour {
    White,
    Black,
    Random,
}

impl StartColour {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "white" | "w" => Some(StartColour::White),
            "black" | "b" => Some(StartColour::Black),
            "random" | "r" => Some(StartColour::Random),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StartColour::White => "white",
            StartColour::Black => "black",
            StartColour::Random => "random",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_index_is_rank_major() {
        let a1 = Square::new(0, 0).unwrap();
        let h1 = Square::new(7, 0).unwrap();
        let a8 = Square::new(0, 7).unwrap();
        assert_eq!(a1.index(), 0);
        assert_eq!(h1.index(), 7);
        assert_eq!(a8.index(), 56);
        assert_eq!(Square::from_index(63), Square::new(7, 7));
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn square_rejects_off_board_coordinates() {
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        assert!(Square::parse("i1").is_none());
        assert!(Square::parse("a9").is_none());
        assert!(Square::parse("a0").is_none());
        assert!(Square::parse("E2").is_none());
    }

    #[test]
    fn square_colour_parity() {
        assert!(!Square::parse("a1").unwrap().is_light());
        assert!(Square::parse("h1").unwrap().is_light());
        assert!(!Square::parse("h8").unwrap().is_light());
    }

    #[test]
    fn square_offset_stays_on_board() {
        let a1 = Square::parse("a1").unwrap();
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(1, 1), Square::parse("b2"));
        assert_eq!(Square::parse("h8").unwrap().offset(0, 1), None);
    }

    #[test]
    fn fen_letters_round_trip_through_pieces() {
        for c in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_fen_char(c).unwrap();
            assert_eq!(piece.fen_char(), c);
        }
        assert_eq!(Piece::from_fen_char('1'), None);
    }

    #[test]
    fn promotion_cycle_visits_every_piece() {
        let mut p = Promotion::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(p.letter());
            p = p.cycle();
        }
        assert_eq!(p, Promotion::Queen);
        assert_eq!(seen, vec!['Q', 'R', 'B', 'N']);
    }
}
