//! Domain errors for rooms and the registry.
//!
//! Handlers never surface these to clients; they are logged and the event is
//! dropped without touching room state.

use crate::room::{ConnectionId, RoomId};
use strictly_grid::{Mark, MoveError};

/// Error returned by [`RoomRegistry`](crate::RoomRegistry) operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RegistryError {
    /// The room already seats two players.
    #[display("Room {} already has 2 players", _0)]
    RoomFull(RoomId),

    /// The connection already holds a seat in the room.
    #[display("Connection {} is already seated in room {}", connection_id, room_id)]
    AlreadySeated {
        /// Room that was joined.
        room_id: RoomId,
        /// Connection that tried to join twice.
        connection_id: ConnectionId,
    },

    /// No active room has this id.
    #[display("Room {} not found", _0)]
    RoomNotFound(RoomId),

    /// The room exists but the connection is not seated in it.
    #[display("Connection {} is not seated in room {}", connection_id, room_id)]
    PlayerNotFound {
        /// Room that was searched.
        room_id: RoomId,
        /// Connection that was not found.
        connection_id: ConnectionId,
    },
}

impl std::error::Error for RegistryError {}

/// Error returned when a move is refused by a room.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TurnError {
    /// No game is running (waiting for an opponent or already concluded).
    #[display("No game in progress")]
    NotActive,

    /// The connection does not hold a seat in the room.
    #[display("Connection {} is not seated in this room", _0)]
    NotSeated(ConnectionId),

    /// The mark does not belong to the sender, or it is the other mark's turn.
    #[display("It's not {}'s turn", _0)]
    OutOfTurn(Mark),

    /// The board refused the move.
    #[display("Invalid move: {}", _0)]
    Move(MoveError),
}

impl std::error::Error for TurnError {}

impl From<MoveError> for TurnError {
    fn from(err: MoveError) -> Self {
        TurnError::Move(err)
    }
}
