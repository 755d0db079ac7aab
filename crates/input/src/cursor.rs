//! Keyboard cursor over the board.
//!
//! Directions are in screen space. With White at the bottom, `Up` moves
//! towards rank 8 and `Left` towards the a-file; with Black at the bottom both
//! are mirrored. The cursor stops at the board edge.

use crate::types::{Colour, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCursor {
    square: Square,
}

impl BoardCursor {
    pub fn new(square: Square) -> Self {
        Self { square }
    }

    pub fn square(&self) -> Square {
        self.square
    }

    pub fn set(&mut self, square: Square) {
        self.square = square;
    }

    /// Move one square; `bottom` is the colour drawn at the bottom.
    pub fn step(&mut self, direction: Direction, bottom: Colour) {
        let (df, dr) = match direction {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        };
        let (df, dr) = match bottom {
            Colour::White => (df, dr),
            Colour::Black => (-df, -dr),
        };
        if let Some(next) = self.square.offset(df, dr) {
            self.square = next;
        }
    }
}

const E2: Square = match Square::new(4, 1) {
    Some(sq) => sq,
    None => panic!("e2 is on the board"),
};

impl Default for BoardCursor {
    fn default() -> Self {
        Self { square: E2 }
    }
}
