//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per LyricLens endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Server info
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Song endpoints
    // ========================================================================

    pub async fn search(&self, query: &str) -> Response {
        self.client
            .get(format!("{}/api/song/search", self.base_url))
            .query(&[("query", query)])
            .send()
            .await
            .expect("Search request failed")
    }

    /// Search without any `query` parameter.
    pub async fn search_without_query(&self) -> Response {
        self.client
            .get(format!("{}/api/song/search", self.base_url))
            .send()
            .await
            .expect("Search request failed")
    }

    pub async fn get_lyrics(&self, artist_name: &str, track_name: &str) -> Response {
        self.client
            .get(format!("{}/api/song/lyrics", self.base_url))
            .query(&[("artist_name", artist_name), ("track_name", track_name)])
            .send()
            .await
            .expect("Lyrics request failed")
    }

    /// Lyrics request with a hand-picked query string.
    pub async fn get_lyrics_raw(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/api/song/lyrics", self.base_url))
            .query(query)
            .send()
            .await
            .expect("Lyrics request failed")
    }

    pub async fn analyze(&self, track_name: &str, artist_name: &str, lyrics: &str) -> Response {
        self.analyze_json(json!({
            "track_name": track_name,
            "artist_name": artist_name,
            "lyrics": lyrics,
        }))
        .await
    }

    pub async fn analyze_json(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/api/song/analyze", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Analyze request failed")
    }

    pub async fn analyze_raw(&self, body: &'static str) -> Response {
        self.client
            .post(format!("{}/api/song/analyze", self.base_url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Analyze request failed")
    }

    pub async fn search_tracks(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/api/song/tracks", self.base_url))
            .query(query)
            .send()
            .await
            .expect("Track search request failed")
    }
}
