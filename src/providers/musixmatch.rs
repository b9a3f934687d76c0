//! Musixmatch API client.
//!
//! Musixmatch answers HTTP 200 even for failed calls and reports the real
//! outcome in `message.header.status_code`, so both are checked.

use super::{error_body, LyricsProvider, ProviderError, TrackCatalog};
use crate::song::{Lyrics, Pagination, TrackPage, TrackSummary};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const MUSIXMATCH_API_BASE: &str = "https://api.musixmatch.com/ws/1.1";

pub struct MusixmatchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct Envelope {
    message: EnvelopeMessage,
}

#[derive(Deserialize)]
struct EnvelopeMessage {
    header: Header,
    // An empty result comes back as `[]` or `""` instead of an object.
    #[serde(default)]
    body: serde_json::Value,
}

#[derive(Deserialize)]
struct Header {
    status_code: u16,
    #[serde(default)]
    available: Option<u64>,
}

#[derive(Deserialize, Default)]
struct TrackSearchBody {
    #[serde(default)]
    track_list: Vec<TrackListItem>,
}

#[derive(Deserialize)]
struct TrackListItem {
    track: TrackSummary,
}

#[derive(Deserialize)]
struct LyricsBody {
    lyrics: MusixmatchLyrics,
}

#[derive(Deserialize)]
struct MusixmatchLyrics {
    #[serde(default)]
    lyrics_body: String,
    #[serde(default)]
    lyrics_copyright: Option<String>,
}

fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Option<T> {
    if body.is_object() {
        serde_json::from_value(body).ok()
    } else {
        None
    }
}

impl MusixmatchClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_sec: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn call(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<EnvelopeMessage, ProviderError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method = %method, "Calling Musixmatch");

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            warn!(method = %method, status = status.as_u16(), "Musixmatch request failed");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: Envelope = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse Musixmatch response: {}", e))
        })?;

        let code = envelope.message.header.status_code;
        if code != 200 {
            warn!(method = %method, status_code = code, "Musixmatch reported an error");
            return Err(ProviderError::Api {
                status: code,
                message: format!("Musixmatch {} returned status_code {}", method, code),
            });
        }

        Ok(envelope.message)
    }
}

#[async_trait]
impl TrackCatalog for MusixmatchClient {
    async fn search_tracks(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<TrackPage, ProviderError> {
        let message = self
            .call(
                "track.search",
                &[
                    ("q", query.to_string()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                    ("s_track_rating", "desc".to_string()),
                    ("f_has_lyrics", "1".to_string()),
                ],
            )
            .await?;

        let total_results = message.header.available.unwrap_or(0);
        let body: TrackSearchBody = parse_body(message.body).unwrap_or_default();

        Ok(TrackPage {
            songs: body.track_list.into_iter().map(|item| item.track).collect(),
            pagination: Pagination {
                current_page: page,
                page_size,
                total_results,
            },
        })
    }
}

#[async_trait]
impl LyricsProvider for MusixmatchClient {
    fn name(&self) -> &str {
        "musixmatch"
    }

    async fn lyrics(&self, artist_name: &str, track_name: &str) -> Result<Lyrics, ProviderError> {
        let message = self
            .call(
                "matcher.lyrics.get",
                &[
                    ("q_track", track_name.to_string()),
                    ("q_artist", artist_name.to_string()),
                ],
            )
            .await?;

        let body: LyricsBody = parse_body(message.body).ok_or_else(|| {
            ProviderError::InvalidResponse("Could not parse lyrics from the API response".to_string())
        })?;

        Ok(Lyrics {
            lyrics: body.lyrics.lyrics_body,
            copyright: body.lyrics.lyrics_copyright.filter(|c| !c.is_empty()),
        })
    }
}
