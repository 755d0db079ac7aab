//! Notation codec - placement strings and square-pair move text
//!
//! Converts between the server's text encodings and in-memory values:
//!
//! - **Placement string**: the board field of a FEN record, e.g.
//!   `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`. Ranks are listed from
//!   rank 8 down to rank 1, separated by `/`. Digits `1`-`8` are runs of
//!   empty squares; letters are pieces (uppercase White, lowercase Black).
//! - **Square pair**: `e2e4` style move text. Anything after the fourth
//!   character (such as a promotion letter) is ignored when decoding.
//!
//! Decoding never panics and never returns a partially filled board. On error
//! the caller keeps whatever board it already had.

use thiserror::Error;

use crate::board::Board;
use crate::moves::LegalMoves;
use crate::types::{Move, Piece, Promotion, Square, BOARD_SQUARES};

/// Codec failure. Byte offsets refer to the input text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("placement ended unexpectedly at byte {index}")]
    UnexpectedEnd { index: usize },

    #[error("invalid piece {found:?} at byte {index}")]
    InvalidPiece { found: char, index: usize },

    /// `rank` is the algebraic rank number (1-8).
    #[error("rank {rank} has more than 8 squares (byte {index})")]
    OverlongRank { rank: u8, index: usize },

    #[error("expected '/' at byte {index}, found {found:?}")]
    ExpectedSeparator { found: char, index: usize },

    #[error("unexpected {found:?} after placement at byte {index}")]
    TrailingInput { found: char, index: usize },

    #[error("move text {text:?} is shorter than 4 characters")]
    MoveTooShort { text: String },

    #[error("move text {text:?} names a square off the board")]
    SquareOutOfRange { text: String },

    #[error("more than {limit} legal moves")]
    TooManyMoves { limit: usize },
}

/// Decode a placement string into a complete board.
///
/// Trailing FEN fields are accepted when separated by whitespace, so a full
/// record like `8/8/8/8/8/8/8/8 w - - 0 1` decodes the same as its first field.
///
/// # Examples
///
/// ```
/// use tui_chess_core::notation::decode_board;
///
/// let board = decode_board("8/8/8/8/8/8/8/8").unwrap();
/// assert!(board.is_empty());
///
/// assert!(decode_board("pppppppp").is_err());
/// ```
pub fn decode_board(text: &str) -> Result<Board, NotationError> {
    let bytes = text.as_bytes();
    let mut cells = [None; BOARD_SQUARES];
    let mut i = 0usize;

    for rank in (0..8u8).rev() {
        let mut file = 0u8;
        while file < 8 {
            let Some(&b) = bytes.get(i) else {
                return Err(NotationError::UnexpectedEnd { index: i });
            };
            match b {
                b'1'..=b'8' => {
                    let run = b - b'0';
                    if file + run > 8 {
                        return Err(NotationError::OverlongRank {
                            rank: rank + 1,
                            index: i,
                        });
                    }
                    file += run;
                }
                _ => {
                    let piece = Piece::from_fen_char(b as char).ok_or_else(|| {
                        NotationError::InvalidPiece {
                            found: char_at(text, i),
                            index: i,
                        }
                    })?;
                    cells[(rank as usize) * 8 + file as usize] = Some(piece);
                    file += 1;
                }
            }
            i += 1;
        }

        match bytes.get(i) {
            Some(&b) if is_square_byte(b) => {
                return Err(NotationError::OverlongRank {
                    rank: rank + 1,
                    index: i,
                });
            }
            _ if rank == 0 => break,
            None => return Err(NotationError::UnexpectedEnd { index: i }),
            Some(b'/') => i += 1,
            Some(_) => {
                return Err(NotationError::ExpectedSeparator {
                    found: char_at(text, i),
                    index: i,
                });
            }
        }
    }

    match text[i..].chars().next() {
        None => {}
        Some(c) if c.is_whitespace() => {}
        Some(found) => return Err(NotationError::TrailingInput { found, index: i }),
    }

    Ok(Board::from_cells(cells))
}

/// A byte that would fill a square: a run length or a piece letter.
fn is_square_byte(b: u8) -> bool {
    b.is_ascii_digit() || Piece::from_fen_char(b as char).is_some()
}

/// Encode a board as a placement string (the inverse of [`decode_board`]).
pub fn encode_board(board: &Board) -> String {
    let mut out = String::with_capacity(72);
    for rank in (0..8u8).rev() {
        let mut empty = 0u8;
        for cell in board.rank(rank) {
            match cell {
                Some(piece) => {
                    if empty > 0 {
                        out.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push((b'0' + empty) as char);
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}

/// Decode one square-pair move. Characters past the fourth are ignored.
///
/// Off-board characters are rejected rather than clamped to the nearest edge.
pub fn decode_move(text: &str) -> Result<Move, NotationError> {
    let b = text.as_bytes();
    if b.len() < 4 {
        return Err(NotationError::MoveTooShort {
            text: text.to_string(),
        });
    }
    let squares = Square::from_ascii(b[0], b[1]).zip(Square::from_ascii(b[2], b[3]));
    let (from, to) = squares.ok_or_else(|| NotationError::SquareOutOfRange {
        text: text.to_string(),
    })?;
    Ok(Move::new(from, to))
}

/// Decode a server move list into a legal-move set. Any bad entry fails the whole list.
pub fn decode_moves<I, S>(texts: I) -> Result<LegalMoves, NotationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut moves = LegalMoves::new();
    for text in texts {
        let mv = decode_move(text.as_ref())?;
        moves.insert(mv)?;
    }
    Ok(moves)
}

/// Encode a move for the `makemove` command: square pair plus promotion letter.
///
/// The letter is always appended; the server ignores it for non-promoting moves.
///
/// # Examples
///
/// ```
/// use tui_chess_core::notation::{decode_move, encode_move};
/// use tui_chess_core::types::Promotion;
///
/// let mv = decode_move("e7e8").unwrap();
/// assert_eq!(encode_move(mv, Promotion::Knight), "e7e8N");
/// ```
pub fn encode_move(mv: Move, promotion: Promotion) -> String {
    let mut out = String::with_capacity(5);
    out.push(mv.from.file_char());
    out.push(mv.from.rank_char());
    out.push(mv.to.file_char());
    out.push(mv.to.rank_char());
    out.push(promotion.letter());
    out
}

fn char_at(text: &str, index: usize) -> char {
    text.get(index..)
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
