//! Publish/subscribe transport used by the handlers.

use crate::protocol::ServerEvent;
use crate::room::{ConnectionId, RoomId};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, instrument, trace};

/// Delivers server events to one connection or to every connection in a room.
///
/// Room groups are transport state only: being in a group means receiving
/// that room's broadcasts, not holding a seat.
pub trait Transport {
    /// Sends an event to a single connection.
    fn emit_to_connection(&self, connection_id: &str, event: ServerEvent);

    /// Sends an event to every connection in the room's group.
    fn emit_to_room(&self, room_id: &str, event: ServerEvent);

    /// Adds a connection to a room's group.
    fn add_connection_to_room(&mut self, connection_id: &str, room_id: &str);

    /// Removes a connection from a room's group.
    fn remove_connection_from_room(&mut self, connection_id: &str, room_id: &str);
}

/// In-process transport backed by one unbounded channel per connection.
///
/// The WebSocket layer attaches a channel per socket and drains it into the
/// socket; tests read the receivers directly.
#[derive(Debug, Default)]
pub struct ChannelTransport {
    connections: HashMap<ConnectionId, UnboundedSender<ServerEvent>>,
    groups: HashMap<RoomId, BTreeSet<ConnectionId>>,
}

impl ChannelTransport {
    /// Creates a transport with no connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection whose events go to `outbound`.
    #[instrument(skip(self, outbound))]
    pub fn attach(&mut self, connection_id: ConnectionId, outbound: UnboundedSender<ServerEvent>) {
        debug!("Connection attached");
        self.connections.insert(connection_id, outbound);
    }

    /// Registers a connection and returns the receiving end of its channel.
    pub fn connect(&mut self, connection_id: impl Into<ConnectionId>) -> UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.attach(connection_id.into(), tx);
        rx
    }

    /// Forgets a connection and drops it from every group.
    #[instrument(skip(self))]
    pub fn detach(&mut self, connection_id: &str) {
        self.connections.remove(connection_id);
        self.groups.retain(|_, members| {
            members.remove(connection_id);
            !members.is_empty()
        });
        debug!(connections = self.connections.len(), "Connection detached");
    }

    /// Checks if a connection is attached.
    pub fn is_connected(&self, connection_id: &str) -> bool {
        self.connections.contains_key(connection_id)
    }

    /// Returns the connections in a room's group.
    pub fn members(&self, room_id: &str) -> Vec<&ConnectionId> {
        self.groups
            .get(room_id)
            .map(|members| members.iter().collect())
            .unwrap_or_default()
    }

    fn send(&self, connection_id: &str, event: ServerEvent) {
        match self.connections.get(connection_id) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    debug!(connection_id, "Receiver dropped, event discarded");
                }
            }
            None => debug!(connection_id, "Unknown connection, event discarded"),
        }
    }
}

impl Transport for ChannelTransport {
    fn emit_to_connection(&self, connection_id: &str, event: ServerEvent) {
        trace!(connection_id, event = event.name(), "Emit to connection");
        self.send(connection_id, event);
    }

    fn emit_to_room(&self, room_id: &str, event: ServerEvent) {
        let Some(members) = self.groups.get(room_id) else {
            trace!(room_id, event = event.name(), "Emit to empty room");
            return;
        };
        trace!(room_id, event = event.name(), members = members.len(), "Emit to room");
        for connection_id in members {
            self.send(connection_id, event.clone());
        }
    }

    fn add_connection_to_room(&mut self, connection_id: &str, room_id: &str) {
        self.groups
            .entry(room_id.to_string())
            .or_default()
            .insert(connection_id.to_string());
    }

    fn remove_connection_from_room(&mut self, connection_id: &str, room_id: &str) {
        if let Some(members) = self.groups.get_mut(room_id) {
            members.remove(connection_id);
            if members.is_empty() {
                self.groups.remove(room_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TurnSignal;

    fn wait() -> ServerEvent {
        ServerEvent::Turn(TurnSignal::Wait)
    }

    #[test]
    fn test_room_broadcast_reaches_members_only() {
        let mut transport = ChannelTransport::new();
        let mut a = transport.connect("a");
        let mut b = transport.connect("b");
        let mut c = transport.connect("c");
        transport.add_connection_to_room("a", "r1");
        transport.add_connection_to_room("b", "r1");
        transport.add_connection_to_room("c", "r2");

        transport.emit_to_room("r1", wait());

        assert_eq!(a.try_recv().ok(), Some(wait()));
        assert_eq!(b.try_recv().ok(), Some(wait()));
        assert!(c.try_recv().is_err());
    }

    #[test]
    fn test_direct_emit() {
        let mut transport = ChannelTransport::new();
        let mut a = transport.connect("a");
        let mut b = transport.connect("b");
        transport.emit_to_connection("b", wait());
        assert!(a.try_recv().is_err());
        assert_eq!(b.try_recv().ok(), Some(wait()));
    }

    #[test]
    fn test_detach_leaves_all_groups() {
        let mut transport = ChannelTransport::new();
        let _a = transport.connect("a");
        transport.add_connection_to_room("a", "r1");
        transport.add_connection_to_room("a", "r2");
        transport.detach("a");
        assert!(!transport.is_connected("a"));
        assert!(transport.members("r1").is_empty());
        assert!(transport.members("r2").is_empty());
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let mut transport = ChannelTransport::new();
        drop(transport.connect("a"));
        transport.add_connection_to_room("a", "r1");
        transport.emit_to_room("r1", wait());
        transport.remove_connection_from_room("a", "r1");
        assert!(transport.members("r1").is_empty());
    }
}
