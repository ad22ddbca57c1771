//! Wire protocol: one variant per event name.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.
//! Inbound frames that do not decode into a [`ClientEvent`] never reach the
//! handlers.

use crate::room::{ConnectionId, Player, RoomId};
use serde::{Deserialize, Serialize};
use strictly_grid::{Board, Mark, WinLine};

/// Payload of `joinGame`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGame {
    /// Room to join or create.
    pub room_id: RoomId,
    /// Player e-mail, echoed in `userJoined`.
    #[serde(default)]
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar reference.
    #[serde(default)]
    pub photo: String,
}

/// Payload of `drawOnBoard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawOnBoard {
    /// Room the move is played in.
    pub room_id: RoomId,
    /// 1-based cell index.
    pub index: usize,
    /// Mark the sender places.
    pub value: Mark,
}

/// Events sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Take a seat in a room, creating it if needed.
    JoinGame(JoinGame),
    /// Ask whether a room exists.
    CheckIfRoomExist(RoomId),
    /// Ask for the next game in a room.
    RestartGame(RoomId),
    /// Place a mark.
    DrawOnBoard(DrawOnBoard),
    /// Give up the seat in a room.
    LeaveRoom(RoomId),
}

impl ClientEvent {
    /// Returns the wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinGame(_) => "joinGame",
            ClientEvent::CheckIfRoomExist(_) => "checkIfRoomExist",
            ClientEvent::RestartGame(_) => "restartGame",
            ClientEvent::DrawOnBoard(_) => "drawOnBoard",
            ClientEvent::LeaveRoom(_) => "leaveRoom",
        }
    }
}

/// Whose turn it is, as carried by the `turn` event.
///
/// Serialises as the connection id or one of the sentinels `WAIT` / `STOP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TurnSignal {
    /// Waiting for an opponent.
    Wait,
    /// The game is over.
    Stop,
    /// The connection expected to move.
    Player(ConnectionId),
}

impl TurnSignal {
    const WAIT: &'static str = "WAIT";
    const STOP: &'static str = "STOP";
}

impl From<String> for TurnSignal {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::WAIT => TurnSignal::Wait,
            Self::STOP => TurnSignal::Stop,
            _ => TurnSignal::Player(value),
        }
    }
}

impl From<TurnSignal> for String {
    fn from(signal: TurnSignal) -> Self {
        match signal {
            TurnSignal::Wait => TurnSignal::WAIT.to_string(),
            TurnSignal::Stop => TurnSignal::STOP.to_string(),
            TurnSignal::Player(id) => id,
        }
    }
}

/// Identity echoed to the room when someone joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedUser {
    /// E-mail from `joinGame`.
    pub email: String,
    /// Avatar reference.
    pub photo: String,
    /// Display name.
    pub name: String,
}

/// Payload of `userJoined`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJoined {
    /// Who joined.
    pub user: JoinedUser,
    /// Human-readable notice.
    pub message: String,
}

/// Payload of `checkIfRoomExistResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomExists {
    /// Whether the room is active.
    pub is_success: bool,
}

/// Payload of `winner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// Connection of the winning player.
    pub winner: ConnectionId,
    /// Zero-based positions of the completed line.
    pub indexes: WinLine,
}

/// Payload of `endgame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endgame {
    /// Board full without a line.
    #[serde(rename = "DRAW")]
    Draw,
}

/// Payload of `allPlayerReady`.
pub const ALL_PLAYER_READY: &str = "Ready";

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Whose turn it is.
    Turn(TurnSignal),
    /// Someone took a seat.
    UserJoined(UserJoined),
    /// Both seats are taken.
    AllPlayerReady(String),
    /// Board snapshot at game start.
    UpdateBoard(Board),
    /// Current roster.
    Players(Vec<Player>),
    /// Reply to `checkIfRoomExist`, sent to the asker only.
    CheckIfRoomExistResponse(RoomExists),
    /// Fresh board after a restart.
    Restarted(Board),
    /// Board snapshot after a move.
    ReceivingDraw(Board),
    /// A line was completed.
    Winner(Winner),
    /// The game ended without a winner.
    Endgame(Endgame),
    /// Someone gave up their seat.
    PlayerLeft(String),
}

impl ServerEvent {
    /// Returns the wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Turn(_) => "turn",
            ServerEvent::UserJoined(_) => "userJoined",
            ServerEvent::AllPlayerReady(_) => "allPlayerReady",
            ServerEvent::UpdateBoard(_) => "updateBoard",
            ServerEvent::Players(_) => "players",
            ServerEvent::CheckIfRoomExistResponse(_) => "checkIfRoomExistResponse",
            ServerEvent::Restarted(_) => "restarted",
            ServerEvent::ReceivingDraw(_) => "receivingDraw",
            ServerEvent::Winner(_) => "winner",
            ServerEvent::Endgame(_) => "endgame",
            ServerEvent::PlayerLeft(_) => "playerLeft",
        }
    }
}
