//! Room matching server for two-player N×N tic-tac-toe.
//!
//! Clients exchange named JSON events with the server over a WebSocket.
//! A [`RoomRegistry`] pairs connections into rooms of two, [`RoomHandlers`]
//! turn inbound events into registry mutations and room-scoped broadcasts,
//! and a single hub task applies events one at a time.
//!
//! The handlers are transport-agnostic and can be driven directly:
//!
//! ```
//! use strictly_rooms::{ChannelTransport, ClientEvent, JoinGame, RoomHandlers, RoomRegistry, ServerEvent, TurnSignal};
//!
//! let mut transport = ChannelTransport::new();
//! let mut rx = transport.connect("alice");
//! let mut handlers = RoomHandlers::new(RoomRegistry::default(), transport);
//!
//! handlers.dispatch("alice", ClientEvent::JoinGame(JoinGame {
//!     room_id: "lobby".into(),
//!     email: String::new(),
//!     name: "Alice".into(),
//!     photo: String::new(),
//! }));
//!
//! assert_eq!(rx.try_recv().ok(), Some(ServerEvent::Turn(TurnSignal::Wait)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod handlers;
mod hub;
mod protocol;
mod registry;
mod room;
mod transport;
mod ws;

pub use config::{ConfigError, ServerConfig};
pub use error::{RegistryError, TurnError};
pub use handlers::RoomHandlers;
pub use hub::{HubCommand, HubHandle, spawn_hub};
pub use protocol::{
    ALL_PLAYER_READY, ClientEvent, DrawOnBoard, Endgame, JoinGame, JoinedUser, RoomExists,
    ServerEvent, TurnSignal, UserJoined, Winner,
};
pub use registry::{Departure, JoinOutcome, RoomRegistry};
pub use room::{Candidate, ConnectionId, Player, Room, RoomId, RoomPhase};
pub use transport::{ChannelTransport, Transport};
pub use ws::{decode_frame, router};
