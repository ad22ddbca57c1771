//! Game rules for N×N tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board): the winning line geometry,
//! win detection and draw detection. Rules are kept apart from board storage
//! so the arbiter in [`Game`](crate::Game) can compose them.

pub mod draw;
pub mod lines;
pub mod win;

pub use draw::is_full;
pub use lines::{WinLine, generate_win_lines};
pub use win::winning_line;
