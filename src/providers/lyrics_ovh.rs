//! lyrics.ovh API client.
//!
//! Suggestions come from `/suggest/{query}`, lyrics from
//! `/v1/{artist}/{title}`. The service needs no key.

use super::{error_body, LyricsProvider, ProviderError, SongSearchProvider};
use crate::song::{Lyrics, SuggestionItem};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const LYRICS_OVH_API_BASE: &str = "https://api.lyrics.ovh";

pub struct LyricsOvhClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    data: Vec<SuggestEntry>,
}

#[derive(Deserialize)]
struct SuggestEntry {
    title: Option<String>,
    preview: Option<String>,
    artist: Option<SuggestArtist>,
    album: Option<SuggestAlbum>,
}

#[derive(Deserialize)]
struct SuggestArtist {
    name: Option<String>,
}

#[derive(Deserialize)]
struct SuggestAlbum {
    title: Option<String>,
    cover_medium: Option<String>,
    cover: Option<String>,
}

#[derive(Deserialize)]
struct LyricsResponse {
    lyrics: Option<String>,
    error: Option<String>,
}

impl SuggestEntry {
    fn into_suggestion(self) -> Option<SuggestionItem> {
        let title = self.title?;
        let artist = self.artist.and_then(|a| a.name)?;
        let (album, cover_url) = match self.album {
            Some(album) => (album.title, album.cover_medium.or(album.cover)),
            None => (None, None),
        };
        Some(SuggestionItem {
            title,
            artist,
            album,
            preview_url: self.preview.filter(|p| !p.is_empty()),
            cover_url,
        })
    }
}

impl LyricsOvhClient {
    /// # Arguments
    /// * `base_url` - Base URL of the API, without trailing slash (e.g. "https://api.lyrics.ovh").
    /// * `timeout_sec` - Per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout_sec: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SongSearchProvider for LyricsOvhClient {
    fn name(&self) -> &str {
        "lyrics.ovh"
    }

    async fn suggest(&self, query: &str) -> Result<Vec<SuggestionItem>, ProviderError> {
        let url = format!("{}/suggest/{}", self.base_url, urlencoding::encode(query));
        debug!(query = %query, "Fetching suggestions from lyrics.ovh");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            warn!(status = status.as_u16(), "lyrics.ovh suggest failed");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: SuggestResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse suggestions: {}", e))
        })?;

        Ok(body
            .data
            .into_iter()
            .filter_map(SuggestEntry::into_suggestion)
            .collect())
    }
}

#[async_trait]
impl LyricsProvider for LyricsOvhClient {
    fn name(&self) -> &str {
        "lyrics.ovh"
    }

    async fn lyrics(&self, artist_name: &str, track_name: &str) -> Result<Lyrics, ProviderError> {
        let url = format!(
            "{}/v1/{}/{}",
            self.base_url,
            urlencoding::encode(artist_name),
            urlencoding::encode(track_name)
        );
        debug!(artist = %artist_name, track = %track_name, "Fetching lyrics from lyrics.ovh");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            let message = serde_json::from_str::<LyricsResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: LyricsResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse lyrics: {}", e))
        })?;

        match body.lyrics {
            Some(lyrics) => Ok(Lyrics {
                lyrics,
                copyright: None,
            }),
            None => Err(ProviderError::InvalidResponse(
                body.error
                    .unwrap_or_else(|| "Response has no lyrics field".to_string()),
            )),
        }
    }
}
