//! Board module - immutable 8x8 piece placement
//!
//! A `Board` is always a complete 64-slot array indexed by `rank * 8 + file`.
//! There is no move or mutation API: boards are only produced by the notation
//! codec from a server snapshot and replaced wholesale on every update.

use crate::types::{Cell, Piece, Square, BOARD_SQUARES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; BOARD_SQUARES],
}

impl Board {
    /// A board with every slot empty.
    pub const fn empty() -> Self {
        Self {
            cells: [None; BOARD_SQUARES],
        }
    }

    pub(crate) fn from_cells(cells: [Cell; BOARD_SQUARES]) -> Self {
        Self { cells }
    }

    pub fn piece_at(&self, sq: Square) -> Cell {
        self.cells[sq.index()]
    }

    pub fn cells(&self) -> &[Cell; BOARD_SQUARES] {
        &self.cells
    }

    /// Iterate the pieces of one rank from file a to file h.
    pub fn rank(&self, rank: u8) -> impl Iterator<Item = Cell> + '_ {
        let start = (rank as usize).min(7) * 8;
        self.cells[start..start + 8].iter().copied()
    }

    /// Iterate occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            let piece = (*cell)?;
            Square::from_index(i).map(|sq| (sq, piece))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
