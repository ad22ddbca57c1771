//! Event handlers: inbound events in, registry mutations and broadcasts out.
//!
//! Every handler runs to completion before the next one starts and looks the
//! room up again by id, since an earlier event may have changed or deleted it.
//! Rejected events are logged and leave no trace: no state change, no
//! broadcast.

use crate::config::ServerConfig;
use crate::protocol::{
    ALL_PLAYER_READY, ClientEvent, DrawOnBoard, Endgame, JoinGame, JoinedUser, RoomExists,
    ServerEvent, TurnSignal, UserJoined, Winner,
};
use crate::registry::{Departure, JoinOutcome, RoomRegistry, random_mark};
use crate::room::{Candidate, RoomPhase};
use crate::transport::Transport;
use rand::SeedableRng;
use rand::rngs::StdRng;
use strictly_grid::MoveOutcome;
use tracing::{debug, info, instrument, warn};

/// Room event handlers over a transport.
#[derive(Debug)]
pub struct RoomHandlers<T> {
    registry: RoomRegistry,
    transport: T,
    rng: StdRng,
    leave_on_disconnect: bool,
}

impl<T: Transport> RoomHandlers<T> {
    /// Creates handlers around a registry and a transport.
    pub fn new(registry: RoomRegistry, transport: T) -> Self {
        Self {
            registry,
            transport,
            rng: StdRng::from_os_rng(),
            leave_on_disconnect: false,
        }
    }

    /// Creates handlers configured from `config`.
    #[instrument(skip_all)]
    pub fn from_config(config: &ServerConfig, transport: T) -> Self {
        Self::new(RoomRegistry::new(*config.board_side()), transport)
            .with_leave_on_disconnect(*config.leave_on_disconnect())
    }

    /// Replaces the random source used for marks and first movers.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Whether a disconnect gives up every seat the connection holds.
    pub fn with_leave_on_disconnect(mut self, enabled: bool) -> Self {
        self.leave_on_disconnect = enabled;
        self
    }

    /// Returns the registry.
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the transport for mutation.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Checks whether the room is mid-game.
    pub fn is_active(&self, room_id: &str) -> bool {
        self.registry
            .find_room(room_id)
            .is_some_and(|room| matches!(room.phase(), RoomPhase::Active { .. }))
    }

    /// Routes an inbound event to its handler.
    #[instrument(skip(self, event), fields(event = event.name()))]
    pub fn dispatch(&mut self, connection_id: &str, event: ClientEvent) {
        match event {
            ClientEvent::JoinGame(join) => self.join(connection_id, join),
            ClientEvent::CheckIfRoomExist(room_id) => self.check_room_exists(connection_id, &room_id),
            ClientEvent::RestartGame(room_id) => self.restart(connection_id, &room_id),
            ClientEvent::DrawOnBoard(draw) => self.draw_on_board(connection_id, draw),
            ClientEvent::LeaveRoom(room_id) => self.leave(connection_id, &room_id),
        }
    }

    /// Seats a connection, starting the game once the second player arrives.
    #[instrument(skip(self, join), fields(room_id = %join.room_id, name = %join.name))]
    pub fn join(&mut self, connection_id: &str, join: JoinGame) {
        let JoinGame {
            room_id,
            email,
            name,
            photo,
        } = join;

        let candidate = Candidate::new(connection_id.to_string(), name.clone(), photo.clone());
        let outcome = match self.registry.join_or_create(&room_id, candidate, &mut self.rng) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Join refused");
                return;
            }
        };

        self.transport.add_connection_to_room(connection_id, &room_id);
        if matches!(outcome, JoinOutcome::Created(_)) {
            self.transport
                .emit_to_room(&room_id, ServerEvent::Turn(TurnSignal::Wait));
        }

        let message = format!("{} joined the room", name);
        self.transport.emit_to_room(
            &room_id,
            ServerEvent::UserJoined(UserJoined {
                user: JoinedUser { email, photo, name },
                message,
            }),
        );

        let Some(room) = self.registry.find_room(&room_id) else {
            return;
        };
        if room.is_full() {
            self.start_game(&room_id);
        }

        self.broadcast_roster(&room_id);
    }

    /// Replies to the asker only with whether the room is active.
    #[instrument(skip(self))]
    pub fn check_room_exists(&mut self, connection_id: &str, room_id: &str) {
        let is_success = self.registry.contains(room_id);
        debug!(is_success, "Room existence checked");
        self.transport.emit_to_connection(
            connection_id,
            ServerEvent::CheckIfRoomExistResponse(RoomExists { is_success }),
        );
    }

    /// Applies a move and announces the result to the room.
    #[instrument(skip(self, draw), fields(room_id = %draw.room_id, index = draw.index, value = ?draw.value))]
    pub fn draw_on_board(&mut self, connection_id: &str, draw: DrawOnBoard) {
        let DrawOnBoard {
            room_id,
            index,
            value,
        } = draw;

        let Some(room) = self.registry.find_room_mut(&room_id) else {
            warn!("Move for unknown room");
            return;
        };
        let Some(position) = index.checked_sub(1) else {
            warn!("Cell index 0 is out of range");
            return;
        };
        let outcome = match room.play(connection_id, position, value) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Move refused");
                return;
            }
        };

        debug!(board = %room.board().display(), "Move applied");
        self.transport
            .emit_to_room(&room_id, ServerEvent::ReceivingDraw(room.board().clone()));

        match outcome {
            MoveOutcome::Win { line, mark } => {
                let Some(winner) = room.player_with_mark(mark).map(|p| p.id().clone()) else {
                    return;
                };
                info!(winner = %winner, ?mark, "Game won");
                self.transport.emit_to_room(
                    &room_id,
                    ServerEvent::Winner(Winner {
                        winner,
                        indexes: line,
                    }),
                );
                self.transport
                    .emit_to_room(&room_id, ServerEvent::Turn(TurnSignal::Stop));
            }
            MoveOutcome::Draw => {
                info!("Game drawn");
                self.transport
                    .emit_to_room(&room_id, ServerEvent::Endgame(Endgame::Draw));
                self.transport
                    .emit_to_room(&room_id, ServerEvent::Turn(TurnSignal::Stop));
            }
            MoveOutcome::Continue { .. } => {
                let Some(next) = room.next_mover_after(value).cloned() else {
                    return;
                };
                debug!(next = %next, "Turn passes");
                self.transport
                    .emit_to_room(&room_id, ServerEvent::Turn(TurnSignal::Player(next)));
            }
        }
    }

    /// Records a restart request; the new game starts once everyone asked.
    ///
    /// Requests during a running game are ignored.
    #[instrument(skip(self))]
    pub fn restart(&mut self, connection_id: &str, room_id: &str) {
        let Some(room) = self.registry.find_room_mut(room_id) else {
            warn!("Restart for unknown room");
            return;
        };
        if matches!(room.phase(), RoomPhase::Active { .. }) {
            warn!("Restart refused while a game is running");
            return;
        }
        if !room.mark_ready(connection_id) {
            warn!("Restart from a connection without a seat");
            return;
        }
        self.registry.reset_board(room_id);

        let Some(room) = self.registry.find_room_mut(room_id) else {
            return;
        };
        if !room.all_ready() {
            debug!("Waiting for the other player to restart");
            return;
        }

        let board = room.board().clone();
        if room.is_full() {
            let first = random_mark(&mut self.rng);
            room.begin(first);
            let Some(first_mover) = room.player_with_mark(first).map(|p| p.id().clone()) else {
                return;
            };
            info!(first_mover = %first_mover, "Game restarted");
            self.transport
                .emit_to_room(room_id, ServerEvent::Restarted(board));
            self.transport
                .emit_to_room(room_id, ServerEvent::Turn(TurnSignal::Player(first_mover)));
        } else {
            room.await_opponent();
            info!("Board reset, waiting for an opponent");
            self.transport
                .emit_to_room(room_id, ServerEvent::Restarted(board));
            self.transport
                .emit_to_room(room_id, ServerEvent::Turn(TurnSignal::Wait));
        }
    }

    /// Gives up the connection's seat and tells whoever remains.
    #[instrument(skip(self))]
    pub fn leave(&mut self, connection_id: &str, room_id: &str) {
        self.transport
            .remove_connection_from_room(connection_id, room_id);

        match self.registry.remove_player(room_id, connection_id) {
            Ok(Departure::RoomClosed) => {}
            Ok(Departure::Remaining(_)) => {
                self.broadcast_roster(room_id);
                self.transport.emit_to_room(
                    room_id,
                    ServerEvent::PlayerLeft(format!("{} left", connection_id)),
                );
            }
            Err(e) => debug!(error = %e, "Leave ignored"),
        }
    }

    /// Handles a dropped connection.
    ///
    /// Seats are kept unless leave-on-disconnect is enabled, in which case the
    /// connection leaves every room it sits in.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, connection_id: &str) {
        info!("Connection closed");
        if self.leave_on_disconnect {
            for room_id in self.registry.rooms_of(connection_id) {
                debug!(room_id = %room_id, "Leaving room after disconnect");
                self.leave(connection_id, &room_id);
            }
        }
    }

    fn start_game(&mut self, room_id: &str) {
        self.registry.reset_board(room_id);
        let first = random_mark(&mut self.rng);
        let Some(room) = self.registry.find_room_mut(room_id) else {
            return;
        };
        room.begin(first);
        let Some(first_mover) = room.player_with_mark(first).map(|p| p.id().clone()) else {
            return;
        };
        info!(room_id, first_mover = %first_mover, "Both players seated");

        self.transport.emit_to_room(
            room_id,
            ServerEvent::AllPlayerReady(ALL_PLAYER_READY.to_string()),
        );
        self.transport
            .emit_to_room(room_id, ServerEvent::UpdateBoard(room.board().clone()));
        self.transport
            .emit_to_room(room_id, ServerEvent::Turn(TurnSignal::Player(first_mover)));
    }

    fn broadcast_roster(&self, room_id: &str) {
        let players = self.registry.players_of(room_id).to_vec();
        self.transport
            .emit_to_room(room_id, ServerEvent::Players(players));
    }
}
