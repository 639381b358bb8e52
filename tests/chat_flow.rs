//! End-to-end tests over real WebSocket connections

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use group_chat_server::{handle_connection, JokeError, JokeSource, RoomRegistry};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct CannedJoke;

#[async_trait]
impl JokeSource for CannedJoke {
    async fn fetch(&self) -> Result<String, JokeError> {
        Ok("I used to be a banker, but I lost interest.".to_string())
    }
}

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let registry = Arc::new(RoomRegistry::new());
    let jokes: Arc<dyn JokeSource> = Arc::new(CannedJoke);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle_connection(stream, registry.clone(), jokes.clone()));
        }
    });

    format!("ws://{}", addr)
}

async fn connect(base: &str, room: &str) -> Ws {
    let (ws, _) = connect_async(format!("{}/chat/{}", base, room)).await.unwrap();
    ws
}

async fn send(ws: &mut Ws, value: Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

async fn recv(ws: &mut Ws) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection ended")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn join(ws: &mut Ws, name: &str, room: &str) {
    send(ws, json!({"type": "join", "name": name})).await;
    let note = recv(ws).await;
    assert_eq!(note, json!({"type": "note", "text": format!("{} joined \"{}\".", name, room)}));
}

#[tokio::test]
async fn test_chat_private_and_leave() {
    let base = start_server().await;
    let mut alice = connect(&base, "lobby").await;
    join(&mut alice, "alice", "lobby").await;
    let mut bob = connect(&base, "lobby").await;
    join(&mut bob, "bob", "lobby").await;

    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "note", "text": "bob joined \"lobby\"."})
    );

    send(&mut bob, json!({"type": "chat", "text": "hi all"})).await;
    let expected = json!({"type": "chat", "name": "bob", "text": "hi all"});
    assert_eq!(recv(&mut alice).await, expected);
    assert_eq!(recv(&mut bob).await, expected);

    send(&mut alice, json!({"type": "chat", "text": "/priv bob just you"})).await;
    assert_eq!(
        recv(&mut bob).await,
        json!({"type": "chat", "name": "Private from alice", "text": "just you"})
    );
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "chat", "name": "Server", "text": "Private message sent to bob"})
    );

    bob.close(None).await.unwrap();
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "note", "text": "bob left lobby."})
    );
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let base = start_server().await;
    let mut alice = connect(&base, "lobby").await;
    join(&mut alice, "alice", "lobby").await;
    let mut carol = connect(&base, "games").await;
    join(&mut carol, "carol", "games").await;

    send(&mut carol, json!({"type": "chat", "text": "/members"})).await;
    assert_eq!(
        recv(&mut carol).await,
        json!({"type": "chat", "name": "Server", "text": "No other members in the room."})
    );

    send(&mut alice, json!({"type": "chat", "text": "lobby only"})).await;
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "chat", "name": "alice", "text": "lobby only"})
    );

    // carol sees her own joke, never alice's chat
    send(&mut carol, json!({"type": "get-joke"})).await;
    assert_eq!(
        recv(&mut carol).await,
        json!({"type": "chat", "name": "Server", "text": "I used to be a banker, but I lost interest."})
    );
}

#[tokio::test]
async fn test_unknown_type_closes_connection() {
    let base = start_server().await;
    let mut alice = connect(&base, "lobby").await;
    join(&mut alice, "alice", "lobby").await;

    send(&mut alice, json!({"type": "bogus"})).await;

    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match alice.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(ended.is_ok());
}

#[tokio::test]
async fn test_unknown_path_is_rejected() {
    let base = start_server().await;
    assert!(connect_async(format!("{}/elsewhere", base)).await.is_err());
}

struct StalledJoke;

#[async_trait]
impl JokeSource for StalledJoke {
    async fn fetch(&self) -> Result<String, JokeError> {
        std::future::pending().await
    }
}

/// Serve exactly one connection, handing back the handler's result
async fn serve_one(
    jokes: Arc<dyn JokeSource>,
) -> (
    String,
    tokio::task::JoinHandle<Result<(), group_chat_server::AppError>>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let registry = Arc::new(RoomRegistry::new());

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        handle_connection(stream, registry, jokes).await
    });

    (format!("ws://{}", addr), handle)
}

#[tokio::test]
async fn test_close_during_pending_joke_ends_handler() {
    let (base, handler) = serve_one(Arc::new(StalledJoke)).await;
    let mut alice = connect(&base, "lobby").await;
    join(&mut alice, "alice", "lobby").await;

    send(&mut alice, json!({"type": "get-joke"})).await;
    alice.close(None).await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(3), handler)
        .await
        .expect("handler still running after the client closed")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_rejected_path_is_not_a_handler_error() {
    let (base, handler) = serve_one(Arc::new(CannedJoke)).await;
    assert!(connect_async(format!("{}/elsewhere", base)).await.is_err());

    let result = tokio::time::timeout(Duration::from_secs(3), handler)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}
