//! Group WebSocket Chat Server Library
//!
//! A small multi-room WebSocket chat server built with tokio-tungstenite.
//!
//! # Features
//! - Rooms selected by connection path (`/chat/<room>`), created on first use
//! - Join announcements, plain chat broadcast
//! - `/name` renames, `/priv` private messages, `/members` listing
//! - Jokes fetched from an HTTP API on request
//! - Leave announcements on disconnect
//!
//! # Architecture
//! - `RoomRegistry` owns every `Room` and is passed to each connection
//! - Each connection runs a `handler` task driving one `ChatSession`
//! - A `Room` keeps its members behind a lock; delivery goes through each
//!   member's unbounded outbound channel and never fails the sender
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use group_chat_server::{handle_connection, HttpJokeSource, JokeSource, RoomRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     let registry = Arc::new(RoomRegistry::new());
//!     let jokes: Arc<dyn JokeSource> = Arc::new(HttpJokeSource::default());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         tokio::spawn(handle_connection(stream, registry.clone(), jokes.clone()));
//!     }
//! }
//! ```

pub mod command;
pub mod error;
pub mod handler;
pub mod joke;
pub mod member;
pub mod message;
pub mod registry;
pub mod room;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use command::Command;
pub use error::{AppError, JokeError};
pub use handler::handle_connection;
pub use joke::{HttpJokeSource, JokeSource};
pub use member::{Member, Outbound};
pub use message::{ClientMessage, ServerMessage};
pub use registry::RoomRegistry;
pub use room::Room;
pub use session::ChatSession;
pub use types::{RoomName, SessionId};
