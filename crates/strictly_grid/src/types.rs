//! Core domain types for N×N tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Mark a player places on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// The X mark.
    X,
    /// The O mark.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single cell of the board.
///
/// `index` is 1-based and row-major. A cell goes from empty to marked exactly
/// once per game; the board refuses a second assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    index: usize,
    value: Option<Mark>,
}

impl Cell {
    /// Creates an empty cell with the given 1-based index.
    pub fn empty(index: usize) -> Self {
        Self { index, value: None }
    }

    /// Returns the 1-based index of the cell.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the mark in the cell, if any.
    pub fn value(&self) -> Option<Mark> {
        self.value
    }

    /// Checks if the cell holds no mark.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// Error returned when a cell list does not describe a square board.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{} cells cannot form a square board with 1-based row-major indices", cells)]
pub struct BoardShapeError {
    /// Number of cells supplied.
    pub cells: usize,
}

/// N×N board stored row-major.
///
/// Serialises as the bare list of cells, which is what clients render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Board {
    side: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board with `side * side` cells.
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: (1..=side * side).map(Cell::empty).collect(),
        }
    }

    /// Returns the length of one side of the board.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Returns the total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Checks if the board has no cells at all (side of zero).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Gets the cell at a zero-based position.
    pub fn get(&self, pos: usize) -> Option<&Cell> {
        self.cells.get(pos)
    }

    /// Checks whether the cell at a zero-based position exists and is empty.
    pub fn is_vacant(&self, pos: usize) -> bool {
        self.get(pos).is_some_and(Cell::is_empty)
    }

    /// Places `mark` at a zero-based position.
    ///
    /// Returns `false` and leaves the board untouched when the position is
    /// out of range or already marked.
    pub(crate) fn place(&mut self, pos: usize, mark: Mark) -> bool {
        match self.cells.get_mut(pos) {
            Some(cell) if cell.value.is_none() => {
                cell.value = Some(mark);
                true
            }
            _ => false,
        }
    }

    /// Returns the zero-based positions holding `mark`.
    pub fn positions_of(&self, mark: Mark) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.value == Some(mark))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        self.cells
            .chunks(self.side.max(1))
            .map(|row| {
                row.iter()
                    .map(|cell| match cell.value {
                        Some(mark) => mark.to_string(),
                        None => cell.index.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(3)
    }
}

impl From<Board> for Vec<Cell> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

impl TryFrom<Vec<Cell>> for Board {
    type Error = BoardShapeError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        let side = (0..=cells.len())
            .find(|side| side * side >= cells.len())
            .unwrap_or(0);
        let well_formed = side * side == cells.len()
            && cells
                .iter()
                .enumerate()
                .all(|(pos, cell)| cell.index == pos + 1);
        if !well_formed {
            return Err(BoardShapeError { cells: cells.len() });
        }
        Ok(Self { side, cells })
    }
}
