//! Rooms, their players and the per-room game lifecycle.

use crate::error::TurnError;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strictly_grid::{Board, Game, Mark, MoveOutcome};
use tracing::{debug, info, instrument};

/// Identifier of a room, chosen by the clients.
pub type RoomId = String;

/// Transport-assigned identity of one connection.
pub type ConnectionId = String;

/// A player asking for a seat.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Candidate {
    /// Connection the player speaks through.
    pub connection_id: ConnectionId,
    /// Display name.
    pub name: String,
    /// Avatar reference (usually a URL).
    pub photo: String,
}

/// A seated player.
///
/// The wire form matches the roster clients expect:
/// `{ "id", "name", "photo", "isX", "isReady" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    id: ConnectionId,
    name: String,
    photo: String,
    #[serde(rename = "isX", with = "mark_as_is_x")]
    mark: Mark,
    is_ready: bool,
}

impl Player {
    /// Seats a candidate with the given mark. New players are ready.
    pub fn seat(candidate: Candidate, mark: Mark) -> Self {
        Self {
            id: candidate.connection_id,
            name: candidate.name,
            photo: candidate.photo,
            mark,
            is_ready: true,
        }
    }

    /// Returns the connection id of the player.
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the avatar reference.
    pub fn photo(&self) -> &str {
        &self.photo
    }

    /// Returns the mark this player places.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Checks if the player is ready for the next game.
    pub fn is_ready(&self) -> bool {
        self.is_ready
    }
}

mod mark_as_is_x {
    use serde::{Deserialize, Deserializer, Serializer};
    use strictly_grid::Mark;

    pub fn serialize<S: Serializer>(mark: &Mark, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*mark == Mark::X)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mark, D::Error> {
        Ok(if bool::deserialize(deserializer)? {
            Mark::X
        } else {
            Mark::O
        })
    }
}

/// Lifecycle phase of a room that exists.
///
/// An absent room is the empty state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// Fewer than two players are seated.
    Waiting,
    /// A game is running and `next` is expected to move.
    Active {
        /// Mark expected to move next.
        next: Mark,
    },
    /// The last game ended in a win or draw; waiting for restart requests.
    Concluded,
}

/// A room seating up to two players around one game.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    players: Vec<Player>,
    game: Game,
    phase: RoomPhase,
}

impl Room {
    /// Maximum number of seated players.
    pub const CAPACITY: usize = 2;

    /// Creates an empty room around a game.
    #[instrument(skip(game))]
    pub fn new(id: RoomId, game: Game) -> Self {
        info!(room_id = %id, "Creating room");
        Self {
            id,
            players: Vec::with_capacity(Self::CAPACITY),
            game,
            phase: RoomPhase::Waiting,
        }
    }

    /// Returns the room id.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Returns the seated players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// Returns the lifecycle phase.
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// Checks if both seats are taken.
    pub fn is_full(&self) -> bool {
        self.players.len() >= Self::CAPACITY
    }

    /// Gets the player using the given connection.
    pub fn player(&self, connection_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == connection_id)
    }

    /// Gets the player holding `mark`.
    pub fn player_with_mark(&self, mark: Mark) -> Option<&Player> {
        self.players.iter().find(|p| p.mark == mark)
    }

    /// Returns the connection that moves after `just_moved`.
    pub fn next_mover_after(&self, just_moved: Mark) -> Option<&ConnectionId> {
        self.player_with_mark(just_moved.opponent()).map(Player::id)
    }

    /// Checks if every seated player asked for the next game.
    pub fn all_ready(&self) -> bool {
        self.players.iter().all(|p| p.is_ready)
    }

    /// Adds a player. Capacity is enforced by the registry.
    pub(crate) fn push_player(&mut self, player: Player) {
        debug!(room_id = %self.id, player_id = %player.id, mark = ?player.mark, "Seating player");
        self.players.push(player);
    }

    /// Removes the player using `connection_id`, returning whether one was seated.
    ///
    /// The room falls back to [`RoomPhase::Waiting`] when a seat is freed.
    pub(crate) fn remove_player(&mut self, connection_id: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != connection_id);
        let removed = self.players.len() != before;
        if removed {
            self.phase = RoomPhase::Waiting;
        }
        removed
    }

    /// Marks the player using `connection_id` as ready, returning whether one was seated.
    pub fn mark_ready(&mut self, connection_id: &str) -> bool {
        match self.players.iter_mut().find(|p| p.id == connection_id) {
            Some(player) => {
                player.is_ready = true;
                true
            }
            None => false,
        }
    }

    /// Swaps in a fresh board.
    pub(crate) fn reset_board(&mut self, board: Board) {
        self.game.reset(board);
    }

    /// Starts a game with `first` to move; every player counts as ready.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn begin(&mut self, first: Mark) {
        info!(?first, "Game started");
        for player in &mut self.players {
            player.is_ready = true;
        }
        self.phase = RoomPhase::Active { next: first };
    }

    /// Returns to waiting for an opponent.
    pub fn await_opponent(&mut self) {
        self.phase = RoomPhase::Waiting;
    }

    /// Ends the game; every player must ask for a restart.
    fn conclude(&mut self) {
        for player in &mut self.players {
            player.is_ready = false;
        }
        self.phase = RoomPhase::Concluded;
    }

    /// Plays `mark` at a zero-based position on behalf of `connection_id`.
    ///
    /// The move is accepted only while a game is running, when `mark` is the
    /// one expected next and belongs to the sender. Win and draw conclude the
    /// game; otherwise the turn passes to the other mark.
    ///
    /// # Errors
    ///
    /// Any [`TurnError`]; room state is unchanged on error.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn play(
        &mut self,
        connection_id: &str,
        position: usize,
        mark: Mark,
    ) -> Result<MoveOutcome, TurnError> {
        let RoomPhase::Active { next } = self.phase else {
            return Err(TurnError::NotActive);
        };
        let player = self
            .player(connection_id)
            .ok_or_else(|| TurnError::NotSeated(connection_id.to_string()))?;
        if player.mark != mark || next != mark {
            return Err(TurnError::OutOfTurn(mark));
        }

        let outcome = self.game.apply_move(position, mark)?;
        if outcome.is_terminal() {
            self.conclude();
        } else if let MoveOutcome::Continue { next } = outcome {
            self.phase = RoomPhase::Active { next };
        }
        Ok(outcome)
    }
}
