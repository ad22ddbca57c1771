//! Draw detection.

use crate::Board;
use tracing::instrument;

/// Checks if every cell of the board holds a mark.
///
/// A full board with no winner is a draw.
#[instrument(skip(board), fields(side = board.side()))]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|cell| !cell.is_empty())
}
