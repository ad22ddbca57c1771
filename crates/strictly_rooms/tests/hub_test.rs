//! The hub applies queued commands in order.

use rand::SeedableRng;
use rand::rngs::StdRng;
use strictly_rooms::{
    ChannelTransport, ClientEvent, HubCommand, JoinGame, RoomHandlers, RoomRegistry, ServerEvent,
    TurnSignal, spawn_hub,
};
use tokio::sync::mpsc;

fn join_event(room: &str, name: &str) -> ClientEvent {
    ClientEvent::JoinGame(JoinGame {
        room_id: room.to_string(),
        email: String::new(),
        name: name.to_string(),
        photo: String::new(),
    })
}

#[tokio::test]
async fn test_hub_serialises_commands() {
    let handlers = RoomHandlers::new(RoomRegistry::default(), ChannelTransport::new())
        .with_rng(StdRng::seed_from_u64(3));
    let (hub, task) = spawn_hub(handlers);

    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    assert!(hub.send(HubCommand::Connect {
        connection_id: "a".into(),
        outbound: tx_a,
    }));
    assert!(hub.send(HubCommand::Connect {
        connection_id: "b".into(),
        outbound: tx_b,
    }));
    hub.send(HubCommand::Event {
        connection_id: "a".into(),
        event: join_event("r1", "Ada"),
    });
    hub.send(HubCommand::Event {
        connection_id: "b".into(),
        event: join_event("r1", "Bob"),
    });
    hub.send(HubCommand::Disconnect {
        connection_id: "b".into(),
    });
    drop(hub);

    let handlers = task.await.unwrap();
    assert_eq!(handlers.registry().player_count("r1"), 2);
    assert!(!handlers.transport().is_connected("b"));
    assert!(handlers.transport().is_connected("a"));
    assert!(handlers.is_active("r1"));

    assert_eq!(rx_a.recv().await, Some(ServerEvent::Turn(TurnSignal::Wait)));
    let mut saw_ready = false;
    while let Ok(event) = rx_b.try_recv() {
        saw_ready |= event.name() == "allPlayerReady";
    }
    assert!(saw_ready);
}
