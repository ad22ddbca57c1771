//! Win detection.

use super::lines::WinLine;
use crate::{Board, Mark};
use tracing::instrument;

/// Returns the first line in `lines` fully held by `mark`.
///
/// Lines are tested in the order given, so when one move completes two lines
/// at once only the earlier one is reported.
#[instrument(skip(board, lines), fields(side = board.side()))]
pub fn winning_line<'a>(board: &Board, lines: &'a [WinLine], mark: Mark) -> Option<&'a WinLine> {
    let marked = board.positions_of(mark);
    lines.iter().find(|line| line.is_covered_by(&marked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::generate_win_lines;

    fn board_with(marks: &[(usize, Mark)]) -> Board {
        let mut board = Board::new(3);
        for &(pos, mark) in marks {
            board.place(pos, mark);
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        let lines = generate_win_lines(3);
        assert_eq!(winning_line(&Board::new(3), &lines, Mark::X), None);
    }

    #[test]
    fn test_winner_top_row() {
        let lines = generate_win_lines(3);
        let board = board_with(&[(0, Mark::X), (1, Mark::X), (2, Mark::X)]);
        assert_eq!(
            winning_line(&board, &lines, Mark::X).map(WinLine::positions),
            Some(&[0, 1, 2][..])
        );
        assert_eq!(winning_line(&board, &lines, Mark::O), None);
    }

    #[test]
    fn test_first_line_wins_when_two_complete() {
        let lines = generate_win_lines(3);
        // Column 0 and row 0 both held by O.
        let board = board_with(&[
            (0, Mark::O),
            (1, Mark::O),
            (2, Mark::O),
            (3, Mark::O),
            (6, Mark::O),
        ]);
        assert_eq!(
            winning_line(&board, &lines, Mark::O).map(WinLine::positions),
            Some(&[0, 3, 6][..])
        );
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let lines = generate_win_lines(3);
        let board = board_with(&[(0, Mark::X), (4, Mark::O), (8, Mark::X)]);
        assert_eq!(winning_line(&board, &lines, Mark::X), None);
    }
}
