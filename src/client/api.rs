//! Access to the LyricLens HTTP API from the client side.

use crate::song::{LyricsAnalysis, SuggestionItem};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with an error payload.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A newer call of the same kind replaced this one.
    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

/// The three backend calls the client controller needs.
#[async_trait]
pub trait LensBackend: Send + Sync {
    async fn search_songs(&self, query: &str) -> Result<Vec<SuggestionItem>, ClientError>;

    /// `Ok(None)` when the backend answered but had no lyrics text.
    async fn get_lyrics(
        &self,
        artist_name: &str,
        track_name: &str,
    ) -> Result<Option<String>, ClientError>;

    async fn analyze_lyrics(
        &self,
        track_name: &str,
        artist_name: &str,
        lyrics: &str,
    ) -> Result<LyricsAnalysis, ClientError>;
}

#[derive(Deserialize)]
struct SuggestionsBody {
    suggestions: Vec<SuggestionItem>,
}

#[derive(Deserialize)]
struct LyricsBody {
    lyrics: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`LensBackend`] talking to a running LyricLens server.
pub struct HttpLensBackend {
    client: Client,
    base_url: String,
}

impl HttpLensBackend {
    /// # Arguments
    /// * `base_url` - Server root, e.g. "http://localhost:8000". `/api` is appended.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn parse<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("Request failed with status {}", status.as_u16()),
            };
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LensBackend for HttpLensBackend {
    async fn search_songs(&self, query: &str) -> Result<Vec<SuggestionItem>, ClientError> {
        debug!("Searching songs for {:?}", query);
        let response = self
            .client
            .get(self.url("/song/search"))
            .query(&[("query", query)])
            .send()
            .await?;
        let body: SuggestionsBody = Self::parse(response).await?;
        Ok(body.suggestions)
    }

    async fn get_lyrics(
        &self,
        artist_name: &str,
        track_name: &str,
    ) -> Result<Option<String>, ClientError> {
        let response = self
            .client
            .get(self.url("/song/lyrics"))
            .query(&[("artist_name", artist_name), ("track_name", track_name)])
            .send()
            .await?;
        let body: LyricsBody = Self::parse(response).await?;
        Ok(body.lyrics)
    }

    async fn analyze_lyrics(
        &self,
        track_name: &str,
        artist_name: &str,
        lyrics: &str,
    ) -> Result<LyricsAnalysis, ClientError> {
        let response = self
            .client
            .post(self.url("/song/analyze"))
            .json(&json!({
                "track_name": track_name,
                "artist_name": artist_name,
                "lyrics": lyrics,
            }))
            .send()
            .await?;
        Self::parse(response).await
    }
}
