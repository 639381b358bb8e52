//! Joke fetching
//!
//! The session only depends on the `JokeSource` trait; `HttpJokeSource`
//! asks an icanhazdadjoke-style endpoint for JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::error::JokeError;

/// Default joke endpoint
pub const DEFAULT_JOKE_URL: &str = "https://icanhazdadjoke.com/";

/// Upper bound on a single joke request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce a joke
#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn fetch(&self) -> Result<String, JokeError>;
}

/// Body returned by the joke endpoint
#[derive(Debug, Deserialize)]
struct JokeResponse {
    joke: String,
}

/// Fetches jokes over HTTP
#[derive(Debug, Clone)]
pub struct HttpJokeSource {
    client: reqwest::Client,
    url: String,
}

impl HttpJokeSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for HttpJokeSource {
    fn default() -> Self {
        Self::new(DEFAULT_JOKE_URL)
    }
}

#[async_trait]
impl JokeSource for HttpJokeSource {
    async fn fetch(&self) -> Result<String, JokeError> {
        debug!("Fetching joke from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let body: JokeResponse = response.json().await?;
        Ok(body.joke)
    }
}
