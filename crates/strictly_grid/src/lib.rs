//! Pure game logic for N×N tic-tac-toe.
//!
//! # Architecture
//!
//! - **Types**: [`Mark`], [`Cell`] and [`Board`]
//! - **Rules**: win line geometry, win and draw detection ([`rules`])
//! - **Arbiter**: [`Game::apply_move`] returning a [`MoveOutcome`]
//!
//! # Example
//!
//! ```
//! use strictly_grid::{Board, Game, Mark, MoveOutcome};
//!
//! let mut game = Game::new(Board::new(3));
//! game.apply_move(0, Mark::X).unwrap();
//! game.apply_move(1, Mark::X).unwrap();
//! let outcome = game.apply_move(2, Mark::X).unwrap();
//! assert!(matches!(outcome, MoveOutcome::Win { mark: Mark::X, .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
pub mod rules;
mod types;

pub use action::{MoveError, MoveOutcome};
pub use game::Game;
pub use rules::{WinLine, generate_win_lines};
pub use types::{Board, BoardShapeError, Cell, Mark};
