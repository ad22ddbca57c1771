//! The WebSocket adapter over a real listener.

use futures::{SinkExt, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::net::SocketAddr;
use strictly_rooms::{
    ALL_PLAYER_READY, ChannelTransport, RoomExists, RoomHandlers, RoomRegistry, ServerEvent,
    TurnSignal, router, spawn_hub,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> SocketAddr {
    let handlers = RoomHandlers::new(RoomRegistry::default(), ChannelTransport::new())
        .with_rng(StdRng::seed_from_u64(11));
    let (hub, _task) = spawn_hub(handlers);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(hub)).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> WsStream {
    let (ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    ws
}

async fn send(ws: &mut WsStream, frame: serde_json::Value) {
    ws.send(Message::text(frame.to_string())).await.unwrap();
}

async fn recv(ws: &mut WsStream) -> ServerEvent {
    loop {
        let message = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for an event")
            .expect("Socket closed")
            .unwrap();
        if let Message::Text(_) = message {
            return serde_json::from_str(message.to_text().unwrap()).unwrap();
        }
    }
}

fn join_frame(room: &str, name: &str) -> serde_json::Value {
    json!({"event": "joinGame", "data": {"roomId": room, "name": name}})
}

#[tokio::test]
async fn test_malformed_frames_are_dropped() {
    let addr = start_server().await;
    let mut ws = connect(addr).await;

    ws.send(Message::text("not json")).await.unwrap();
    send(&mut ws, json!({"event": "teleport", "data": "r1"})).await;
    send(&mut ws, json!({"event": "checkIfRoomExist", "data": "r1"})).await;
    assert_eq!(
        recv(&mut ws).await,
        ServerEvent::CheckIfRoomExistResponse(RoomExists { is_success: false })
    );

    // The session is still usable afterwards.
    send(&mut ws, join_frame("r1", "Ada")).await;
    assert_eq!(recv(&mut ws).await, ServerEvent::Turn(TurnSignal::Wait));
    assert_eq!(recv(&mut ws).await.name(), "userJoined");
    assert_eq!(recv(&mut ws).await.name(), "players");
}

#[tokio::test]
async fn test_two_sockets_start_a_game() {
    let addr = start_server().await;
    let mut ada = connect(addr).await;
    let mut bob = connect(addr).await;

    send(&mut ada, join_frame("r1", "Ada")).await;
    for _ in 0..3 {
        recv(&mut ada).await;
    }
    send(&mut bob, join_frame("r1", "Bob")).await;

    for ws in [&mut ada, &mut bob] {
        assert_eq!(recv(ws).await.name(), "userJoined");
        assert_eq!(
            recv(ws).await,
            ServerEvent::AllPlayerReady(ALL_PLAYER_READY.to_string())
        );
        assert_eq!(recv(ws).await.name(), "updateBoard");
        match recv(ws).await {
            ServerEvent::Turn(TurnSignal::Player(id)) => assert!(!id.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
        match recv(ws).await {
            ServerEvent::Players(players) => assert_eq!(players.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_health() {
    let addr = start_server().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.ends_with("ok"));
}
