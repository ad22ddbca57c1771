//! Winning line geometry for an N×N board.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One winning combination: `n` zero-based cell positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinLine(Vec<usize>);

impl WinLine {
    /// Creates a line from zero-based positions.
    pub fn new(positions: Vec<usize>) -> Self {
        Self(positions)
    }

    /// Returns the positions of the line.
    pub fn positions(&self) -> &[usize] {
        &self.0
    }

    /// Returns the number of cells in the line.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the line has no cells.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks if every position of the line is in `marked`.
    pub fn is_covered_by(&self, marked: &[usize]) -> bool {
        self.0.iter().all(|pos| marked.contains(pos))
    }
}

impl From<WinLine> for Vec<usize> {
    fn from(line: WinLine) -> Self {
        line.0
    }
}

/// Computes every winning line of an N×N board.
///
/// For each `i` in `0..n` the column `i` is emitted before the row `i`; the
/// main diagonal and the anti-diagonal follow. Yields `2n + 2` lines.
#[instrument]
pub fn generate_win_lines(n: usize) -> Vec<WinLine> {
    let mut lines = Vec::with_capacity(2 * n + 2);

    for i in 0..n {
        lines.push(WinLine((0..n).map(|row| row * n + i).collect()));
        lines.push(WinLine((0..n).map(|col| i * n + col).collect()));
    }

    lines.push(WinLine((0..n).map(|i| i * n + i).collect()));
    lines.push(WinLine((1..=n).map(|i| i * n - i).collect()));

    debug!(n, count = lines.len(), "Generated win lines");
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_board_has_eight_lines() {
        let lines: Vec<Vec<usize>> = generate_win_lines(3).into_iter().map(Vec::from).collect();
        assert_eq!(
            lines,
            vec![
                vec![0, 3, 6],
                vec![0, 1, 2],
                vec![1, 4, 7],
                vec![3, 4, 5],
                vec![2, 5, 8],
                vec![6, 7, 8],
                vec![0, 4, 8],
                vec![2, 4, 6],
            ]
        );
    }

    #[test]
    fn test_line_count_and_bounds_for_many_sides() {
        for n in 1..=8 {
            let lines = generate_win_lines(n);
            assert_eq!(lines.len(), 2 * n + 2, "side {n}");
            for line in &lines {
                assert_eq!(line.len(), n, "side {n}");
                assert!(line.positions().iter().all(|&pos| pos < n * n));
            }
        }
    }

    #[test]
    fn test_single_cell_board() {
        let lines = generate_win_lines(1);
        assert!(lines.iter().all(|line| line.positions() == [0]));
    }

    #[test]
    fn test_anti_diagonal_on_larger_board() {
        let lines = generate_win_lines(4);
        assert_eq!(lines.last().map(WinLine::positions), Some(&[3, 6, 9, 12][..]));
    }

    #[test]
    fn test_is_covered_by() {
        let line = WinLine::new(vec![0, 4, 8]);
        assert!(line.is_covered_by(&[8, 0, 2, 4]));
        assert!(!line.is_covered_by(&[0, 4]));
    }
}
