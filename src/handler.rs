//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake, room
//! selection from the request path, and bidirectional communication
//! between the socket and a `ChatSession`.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::joke::JokeSource;
use crate::member::Outbound;
use crate::registry::RoomRegistry;
use crate::session::ChatSession;
use crate::types::RoomName;

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake on `/chat/<room>`, then feeds every text
/// frame to a `ChatSession` until the client goes away or sends a frame the
/// protocol does not allow.
pub async fn handle_connection(
    stream: TcpStream,
    registry: Arc<RoomRegistry>,
    jokes: Arc<dyn JokeSource>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake, picking the room from the request path
    let mut room_name = None;
    let handshake = tokio_tungstenite::accept_hdr_async(
        stream,
        |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            match RoomName::from_path(req.uri().path()) {
                Some(name) => {
                    room_name = Some(name);
                    Ok(resp)
                }
                None => {
                    let mut err = ErrorResponse::new(Some("Unknown chat path".to_string()));
                    *err.status_mut() = StatusCode::NOT_FOUND;
                    Err(err)
                }
            }
        },
    )
    .await;

    let ws_stream = match handshake {
        Ok(ws_stream) => ws_stream,
        Err(WsError::Http(resp)) => {
            debug!("Rejected handshake from {}: {}", peer_addr, resp.status());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let Some(room_name) = room_name else {
        return Ok(());
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Channel for server -> client messages
    let (outbound, mut msg_rx) = Outbound::channel();
    let session = ChatSession::new(outbound, &room_name, &registry, jokes);
    let session_id = session.id();
    info!("Session {} connected to {} from {}", session_id, room_name, peer_addr);

    // Spawn write task (ServerMessage -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize message: {}", e);
                    // Continue - don't break on serialization errors
                }
            }
        }
        debug!("Write task ended for session");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Read loop (WebSocket -> ChatSession), one frame at a time
    while let Some(msg_result) = ws_receiver.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                if let Err(e) = session.handle_message(&text) {
                    if e.is_fatal() {
                        warn!("Closing session {}: {}", session_id, e);
                        break;
                    }
                    debug!("Session {}: {}", session_id, e);
                }
            }
            Ok(Message::Close(_)) => {
                debug!("Session {} sent close frame", session_id);
                break;
            }
            Ok(_) => {
                // Binary, ping and pong frames carry no chat protocol
            }
            Err(e) => {
                error!("WebSocket error for {}: {}", session_id, e);
                break;
            }
        }
    }

    session.handle_close();
    drop(session);

    // The writer drains once every handle to this session's channel is gone
    let _ = write_task.await;

    info!("Session {} disconnected", session_id);

    Ok(())
}
