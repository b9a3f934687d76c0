//! In-process fake collaborators

use super::constants::*;
use async_trait::async_trait;
use lyriclens_server::analysis::llm::{
    CompletionOptions, CompletionResponse, FinishReason, LlmError, LlmProvider, Message,
};
use lyriclens_server::providers::{
    LyricsProvider, ProviderError, SongSearchProvider, TrackCatalog,
};
use lyriclens_server::song::{Lyrics, Pagination, SuggestionItem, TrackPage, TrackSummary};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn suggestion(title: &str, artist: &str) -> SuggestionItem {
    SuggestionItem {
        title: title.to_string(),
        artist: artist.to_string(),
        album: None,
        preview_url: None,
        cover_url: Some(format!("https://covers.test/{}.jpg", title)),
    }
}

pub struct FakeSongSearch;

#[async_trait]
impl SongSearchProvider for FakeSongSearch {
    fn name(&self) -> &str {
        "fake-search"
    }

    async fn suggest(&self, query: &str) -> Result<Vec<SuggestionItem>, ProviderError> {
        match query {
            EMPTY_QUERY => Ok(vec![]),
            FAILING_QUERY => Err(ProviderError::Connection("connection reset".to_string())),
            _ => Ok(vec![
                suggestion(KNOWN_TITLE, KNOWN_ARTIST),
                suggestion(SECOND_TITLE, SECOND_ARTIST),
            ]),
        }
    }
}

pub struct FakeLyrics;

#[async_trait]
impl LyricsProvider for FakeLyrics {
    fn name(&self) -> &str {
        "fake-lyrics"
    }

    async fn lyrics(&self, artist_name: &str, _track_name: &str) -> Result<Lyrics, ProviderError> {
        match artist_name {
            UNKNOWN_ARTIST => Err(ProviderError::Api {
                status: 404,
                message: "No lyrics found".to_string(),
            }),
            INSTRUMENTAL_ARTIST => Ok(Lyrics {
                lyrics: String::new(),
                copyright: None,
            }),
            _ => Ok(Lyrics {
                lyrics: KNOWN_LYRICS.to_string(),
                copyright: None,
            }),
        }
    }
}

pub struct FakeTrackCatalog;

#[async_trait]
impl TrackCatalog for FakeTrackCatalog {
    async fn search_tracks(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<TrackPage, ProviderError> {
        Ok(TrackPage {
            songs: vec![TrackSummary {
                track_id: Some(1),
                track_name: Some(query.to_string()),
                artist_name: Some(KNOWN_ARTIST.to_string()),
                album_name: None,
            }],
            pagination: Pagination {
                current_page: page,
                page_size,
                total_results: 1,
            },
        })
    }
}

/// Answers every prompt with the same analysis and counts the calls.
pub struct CountingLlm {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl LlmProvider for CountingLlm {
    fn name(&self) -> &str {
        "counting"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        let content = if prompt.contains(GARBLED_LYRICS) {
            "Sorry, I can only answer in prose.".to_string()
        } else {
            let countries = if prompt.contains("Africa") {
                r#"["Kenya"]"#
            } else {
                "[]"
            };
            format!(
                r#"{{"summary": "{}", "countries_mentioned": {}}}"#,
                ANALYSIS_SUMMARY, countries
            )
        };

        Ok(CompletionResponse {
            message: Message::assistant(content),
            finish_reason: FinishReason::Stop,
            usage: None,
        })
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}
