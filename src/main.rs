//! Group WebSocket Chat Server - Entry Point
//!
//! Starts the TCP listener and the shared room registry, accepting connections.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use group_chat_server::joke::DEFAULT_JOKE_URL;
use group_chat_server::{handle_connection, HttpJokeSource, JokeSource, RoomRegistry};

/// Default server address
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Environment variable overriding the joke endpoint
const JOKE_URL_VAR: &str = "JOKE_API_URL";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=group_chat_server=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("group_chat_server=info")),
        )
        .init();

    // Get bind address from command line or use default
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let joke_url = env::var(JOKE_URL_VAR).unwrap_or_else(|_| DEFAULT_JOKE_URL.to_string());

    // Start TCP listener
    let listener = TcpListener::bind(&addr).await?;
    info!("Group Chat Server listening on {}", addr);

    let registry = Arc::new(RoomRegistry::new());
    let jokes: Arc<dyn JokeSource> = Arc::new(HttpJokeSource::new(joke_url));

    // Connection accept loop
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let registry = Arc::clone(&registry);
                let jokes = Arc::clone(&jokes);

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, registry, jokes).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
