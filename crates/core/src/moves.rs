//! Bounded legal-move set.

use arrayvec::ArrayVec;

use crate::notation::NotationError;
use crate::types::{Move, Square, MAX_LEGAL_MOVES};

/// Legal moves offered by the server for the current position.
///
/// Membership is order-independent; iteration keeps server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoves(ArrayVec<Move, MAX_LEGAL_MOVES>);

impl LegalMoves {
    pub fn new() -> Self {
        Self(ArrayVec::new())
    }

    /// Add a move. Duplicates are kept once.
    pub fn insert(&mut self, mv: Move) -> Result<(), NotationError> {
        if self.0.contains(&mv) {
            return Ok(());
        }
        self.0.try_push(mv).map_err(|_| NotationError::TooManyMoves {
            limit: MAX_LEGAL_MOVES,
        })
    }

    /// True when `from -> to` is one of the legal moves.
    pub fn contains(&self, from: Square, to: Square) -> bool {
        self.0.iter().any(|m| m.from == from && m.to == to)
    }

    /// Destinations reachable from `from`.
    pub fn targets_from(&self, from: Square) -> impl Iterator<Item = Square> + '_ {
        self.0.iter().filter(move |m| m.from == from).map(|m| m.to)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a LegalMoves {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
