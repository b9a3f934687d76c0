//! Clients for the external song search and lyrics services.
//!
//! The server only talks to these services through the traits defined here,
//! so tests can swap in fakes and the lyrics source can be picked at startup:
//! - lyrics.ovh: free suggestion search and lyrics lookup
//! - Musixmatch: keyed, paginated track search and lyrics with copyright

pub mod lyrics_ovh;
pub mod musixmatch;

pub use lyrics_ovh::LyricsOvhClient;
pub use musixmatch::MusixmatchClient;

use crate::song::{Lyrics, SuggestionItem, TrackPage};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by song and lyrics collaborators.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_decode() {
            ProviderError::InvalidResponse(e.to_string())
        } else {
            ProviderError::Connection(e.to_string())
        }
    }
}

/// Turns free text into song suggestions.
#[async_trait]
pub trait SongSearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn suggest(&self, query: &str) -> Result<Vec<SuggestionItem>, ProviderError>;
}

/// Looks up the lyrics of a track by artist and title.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn lyrics(&self, artist_name: &str, track_name: &str) -> Result<Lyrics, ProviderError>;
}

/// Paginated track search.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    async fn search_tracks(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<TrackPage, ProviderError>;
}

/// Reads an error body for logging, never failing.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}
