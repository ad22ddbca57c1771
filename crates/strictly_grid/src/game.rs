//! Turn arbiter for a single game.

use crate::action::{MoveError, MoveOutcome};
use crate::rules::{WinLine, generate_win_lines, is_full, winning_line};
use crate::{Board, Mark};
use tracing::{debug, info, instrument};

/// A board together with the win lines computed for its size.
///
/// The lines are generated once when the game is created and never change;
/// [`Game::reset`] only swaps the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    win_lines: Vec<WinLine>,
}

impl Game {
    /// Creates a game from a (typically freshly cloned) board.
    #[instrument(skip(board), fields(side = board.side()))]
    pub fn new(board: Board) -> Self {
        let win_lines = generate_win_lines(board.side());
        Self { board, win_lines }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the win lines of this game.
    pub fn win_lines(&self) -> &[WinLine] {
        &self.win_lines
    }

    /// Replaces the board with a fresh one, keeping the win lines.
    #[instrument(skip_all)]
    pub fn reset(&mut self, board: Board) {
        debug!(side = board.side(), "Resetting board");
        self.board = board;
    }

    /// Places `mark` at a zero-based position and evaluates the result.
    ///
    /// Win is checked before draw, so filling the last cell with a winning
    /// move reports [`MoveOutcome::Win`].
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfRange`] or [`MoveError::CellOccupied`]; the board is
    /// left untouched in both cases.
    #[instrument(skip(self), fields(side = self.board.side()))]
    pub fn apply_move(&mut self, position: usize, mark: Mark) -> Result<MoveOutcome, MoveError> {
        let cells = self.board.len();
        if position >= cells {
            return Err(MoveError::OutOfRange { position, cells });
        }
        if !self.board.place(position, mark) {
            return Err(MoveError::CellOccupied(position));
        }

        if let Some(line) = winning_line(&self.board, &self.win_lines, mark) {
            info!(?mark, line = ?line.positions(), "Line completed");
            return Ok(MoveOutcome::Win {
                line: line.clone(),
                mark,
            });
        }

        if is_full(&self.board) {
            info!("Board full without a line");
            return Ok(MoveOutcome::Draw);
        }

        Ok(MoveOutcome::Continue {
            next: mark.opponent(),
        })
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continue_names_opponent() {
        let mut game = Game::default();
        assert_eq!(
            game.apply_move(4, Mark::X),
            Ok(MoveOutcome::Continue { next: Mark::O })
        );
    }

    #[test]
    fn test_occupied_cell_is_noop() {
        let mut game = Game::default();
        game.apply_move(4, Mark::X).unwrap();
        let before = game.clone();
        assert_eq!(game.apply_move(4, Mark::O), Err(MoveError::CellOccupied(4)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut game = Game::default();
        assert_eq!(
            game.apply_move(9, Mark::X),
            Err(MoveError::OutOfRange {
                position: 9,
                cells: 9
            })
        );
        assert_eq!(game, Game::default());
    }

    #[test]
    fn test_reset_keeps_lines() {
        let mut game = Game::default();
        game.apply_move(0, Mark::X).unwrap();
        let lines = game.win_lines().to_vec();
        game.reset(Board::new(3));
        assert!(game.board().is_vacant(0));
        assert_eq!(game.win_lines(), lines.as_slice());
    }
}
