//! The hub task: sole owner of the handlers.
//!
//! Connections never touch room state directly. They push [`HubCommand`]s
//! into one queue and the hub applies them in arrival order, so handlers
//! never interleave and no lock guards the registry.

use crate::handlers::RoomHandlers;
use crate::protocol::{ClientEvent, ServerEvent};
use crate::room::ConnectionId;
use crate::transport::ChannelTransport;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Work item for the hub.
#[derive(Debug)]
pub enum HubCommand {
    /// A connection opened; its events go to `outbound`.
    Connect {
        /// New connection id.
        connection_id: ConnectionId,
        /// Channel drained into the connection's socket.
        outbound: UnboundedSender<ServerEvent>,
    },
    /// A decoded inbound event.
    Event {
        /// Sender of the event.
        connection_id: ConnectionId,
        /// The event.
        event: ClientEvent,
    },
    /// A connection closed.
    Disconnect {
        /// Connection that closed.
        connection_id: ConnectionId,
    },
}

/// Cloneable handle for submitting commands to the hub.
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: UnboundedSender<HubCommand>,
}

impl HubHandle {
    /// Queues a command. Returns `false` once the hub has stopped.
    pub fn send(&self, command: HubCommand) -> bool {
        if self.tx.send(command).is_err() {
            warn!("Hub stopped, command dropped");
            return false;
        }
        true
    }
}

/// Spawns the hub on the current runtime.
///
/// The hub stops once every [`HubHandle`] is dropped; the join handle yields
/// the handlers back so callers can inspect final state.
#[instrument(skip_all)]
pub fn spawn_hub(
    handlers: RoomHandlers<ChannelTransport>,
) -> (HubHandle, JoinHandle<RoomHandlers<ChannelTransport>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(handlers, rx));
    info!("Hub started");
    (HubHandle { tx }, task)
}

async fn run(
    mut handlers: RoomHandlers<ChannelTransport>,
    mut rx: UnboundedReceiver<HubCommand>,
) -> RoomHandlers<ChannelTransport> {
    while let Some(command) = rx.recv().await {
        apply(&mut handlers, command);
    }
    info!(rooms = handlers.registry().len(), "Hub stopped");
    handlers
}

fn apply(handlers: &mut RoomHandlers<ChannelTransport>, command: HubCommand) {
    match command {
        HubCommand::Connect {
            connection_id,
            outbound,
        } => {
            debug!(connection_id = %connection_id, "Connection opened");
            handlers.transport_mut().attach(connection_id, outbound);
        }
        HubCommand::Event {
            connection_id,
            event,
        } => handlers.dispatch(&connection_id, event),
        HubCommand::Disconnect { connection_id } => {
            handlers.disconnect(&connection_id);
            handlers.transport_mut().detach(&connection_id);
        }
    }
}
