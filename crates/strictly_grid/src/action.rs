//! Outcomes and errors of applying a move.

use crate::Mark;
use crate::rules::WinLine;

/// What a successful move did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// `mark` now holds every cell of `line`.
    Win {
        /// The completed line (first in generation order).
        line: WinLine,
        /// The winning mark.
        mark: Mark,
    },
    /// The board is full and nobody holds a line.
    Draw,
    /// Play continues with the other mark.
    Continue {
        /// Mark expected to move next.
        next: Mark,
    },
}

impl MoveOutcome {
    /// Checks if the move ended the game.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MoveOutcome::Continue { .. })
    }
}

/// Error that can occur when applying a move. The board is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The position is outside the board.
    #[display("Position {} is outside a board of {} cells", position, cells)]
    OutOfRange {
        /// Zero-based position requested.
        position: usize,
        /// Number of cells on the board.
        cells: usize,
    },

    /// The cell already holds a mark.
    #[display("Position {} is already occupied", _0)]
    CellOccupied(usize),
}

impl std::error::Error for MoveError {}
