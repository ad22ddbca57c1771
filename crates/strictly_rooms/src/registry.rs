//! In-memory registry of active rooms.

use crate::error::RegistryError;
use crate::room::{Candidate, Player, Room, RoomId};
use rand::Rng;
use std::collections::HashMap;
use strictly_grid::{Board, Game, Mark};
use tracing::{debug, info, instrument, warn};

/// Flips a fair coin between the two marks.
pub(crate) fn random_mark<R: Rng + ?Sized>(rng: &mut R) -> Mark {
    if rng.random_bool(0.5) { Mark::X } else { Mark::O }
}

/// Result of a successful [`RoomRegistry::join_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The room did not exist; the candidate is its only player.
    Created(Mark),
    /// The candidate took the second seat.
    Joined(Mark),
}

impl JoinOutcome {
    /// Returns the mark assigned to the candidate.
    pub fn mark(self) -> Mark {
        match self {
            JoinOutcome::Created(mark) | JoinOutcome::Joined(mark) => mark,
        }
    }
}

/// Result of a successful [`RoomRegistry::remove_player`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The last player left and the room was deleted.
    RoomClosed,
    /// The room lives on with this many players.
    Remaining(usize),
}

/// Owns every active room, keyed by room id.
///
/// Rooms are created on the first join to an unseen id and deleted when their
/// last player leaves. Every room gets its own deep copy of the template board.
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    template: Board,
}

impl RoomRegistry {
    /// Creates an empty registry whose rooms play on `side × side` boards.
    #[instrument]
    pub fn new(side: usize) -> Self {
        info!(side, "Creating room registry");
        Self {
            rooms: HashMap::new(),
            template: Board::new(side),
        }
    }

    /// Returns the template board cloned into new and restarted rooms.
    pub fn template(&self) -> &Board {
        &self.template
    }

    /// Gets a room by id.
    pub fn find_room(&self, room_id: &str) -> Option<&Room> {
        let room = self.rooms.get(room_id);
        if room.is_none() {
            debug!(room_id, "Room not found");
        }
        room
    }

    /// Gets a room by id for mutation.
    pub fn find_room_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Checks if a room with this id is active.
    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Returns the number of active rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Checks if there are no active rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Seats `candidate` in `room_id`, creating the room if needed.
    ///
    /// A new room gets a fresh board and win lines, and its first player a
    /// random mark. The second player gets the opposite mark.
    ///
    /// # Errors
    ///
    /// [`RegistryError::RoomFull`] when two players are already seated and
    /// [`RegistryError::AlreadySeated`] when the connection already has a seat.
    #[instrument(skip(self, candidate, rng), fields(connection_id = %candidate.connection_id))]
    pub fn join_or_create<R: Rng + ?Sized>(
        &mut self,
        room_id: &str,
        candidate: Candidate,
        rng: &mut R,
    ) -> Result<JoinOutcome, RegistryError> {
        let Some(room) = self.rooms.get_mut(room_id) else {
            let mark = random_mark(rng);
            let mut room = Room::new(room_id.to_string(), Game::new(self.template.clone()));
            room.push_player(Player::seat(candidate, mark));
            self.rooms.insert(room_id.to_string(), room);
            info!(room_id, ?mark, rooms = self.rooms.len(), "Room created");
            return Ok(JoinOutcome::Created(mark));
        };

        if room.player(&candidate.connection_id).is_some() {
            warn!(room_id, "Connection already seated");
            return Err(RegistryError::AlreadySeated {
                room_id: room_id.to_string(),
                connection_id: candidate.connection_id,
            });
        }
        if room.is_full() {
            warn!(room_id, "Room already has 2 players");
            return Err(RegistryError::RoomFull(room_id.to_string()));
        }

        let mark = match room.players().first() {
            Some(first) => first.mark().opponent(),
            None => random_mark(rng),
        };
        room.push_player(Player::seat(candidate, mark));
        info!(room_id, ?mark, players = room.players().len(), "Player joined room");
        Ok(JoinOutcome::Joined(mark))
    }

    /// Removes the player using `connection_id` from `room_id`.
    ///
    /// The sole remaining player leaving deletes the room.
    ///
    /// # Errors
    ///
    /// [`RegistryError::RoomNotFound`] or [`RegistryError::PlayerNotFound`];
    /// nothing changes in either case.
    #[instrument(skip(self))]
    pub fn remove_player(
        &mut self,
        room_id: &str,
        connection_id: &str,
    ) -> Result<Departure, RegistryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_string()))?;

        if room.player(connection_id).is_none() {
            return Err(RegistryError::PlayerNotFound {
                room_id: room_id.to_string(),
                connection_id: connection_id.to_string(),
            });
        }

        if room.players().len() == 1 {
            self.rooms.remove(room_id);
            info!(room_id, rooms = self.rooms.len(), "Last player left, room closed");
            return Ok(Departure::RoomClosed);
        }

        room.remove_player(connection_id);
        let remaining = room.players().len();
        info!(room_id, remaining, "Player left room");
        Ok(Departure::Remaining(remaining))
    }

    /// Clones a fresh template board into the room.
    ///
    /// Returns `false` when the room does not exist.
    #[instrument(skip(self))]
    pub fn reset_board(&mut self, room_id: &str) -> bool {
        match self.rooms.get_mut(room_id) {
            Some(room) => {
                room.reset_board(self.template.clone());
                true
            }
            None => false,
        }
    }

    /// Returns the number of players in a room, zero if it does not exist.
    pub fn player_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, |room| room.players().len())
    }

    /// Returns the players of a room, empty if it does not exist.
    pub fn players_of(&self, room_id: &str) -> &[Player] {
        self.rooms
            .get(room_id)
            .map(Room::players)
            .unwrap_or_default()
    }

    /// Lists the rooms where `connection_id` holds a seat.
    pub fn rooms_of(&self, connection_id: &str) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.player(connection_id).is_some())
            .map(|room| room.id().clone())
            .collect();
        ids.sort();
        ids
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(3)
    }
}
