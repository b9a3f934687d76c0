//! Stub versions of the external services
//!
//! One axum app plays lyrics.ovh, Musixmatch and an OpenAI-compatible chat
//! API at the same base URL, so the real HTTP collaborator clients can be
//! exercised without network access.

use super::constants::*;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const STUB_AI_KEY: &str = "stub-ai-key";
pub const STUB_MUSIXMATCH_KEY: &str = "stub-mxm-key";

#[derive(Clone)]
struct StubState {
    ai_calls: Arc<AtomicUsize>,
}

async fn suggest(Path(query): Path<String>) -> Json<Value> {
    if query == EMPTY_QUERY {
        return Json(json!({"data": [], "total": 0}));
    }
    Json(json!({
        "data": [
            {
                "id": 1,
                "title": KNOWN_TITLE,
                "preview": "https://cdn.test/preview.mp3",
                "artist": {"id": 10, "name": KNOWN_ARTIST},
                "album": {"title": "A Night at the Opera", "cover_medium": "https://cdn.test/cover.jpg"}
            },
            {"id": 2, "title": "Orphan entry without artist"}
        ],
        "total": 2
    }))
}

async fn lyrics_ovh(Path((artist, _title)): Path<(String, String)>) -> Response {
    if artist == UNKNOWN_ARTIST {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "No lyrics found"})),
        )
            .into_response();
    }
    Json(json!({ "lyrics": KNOWN_LYRICS })).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", STUB_AI_KEY))
        .unwrap_or(false)
}

async fn chat_completions(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Authentication Fails"}})),
        )
            .into_response();
    }
    state.ai_calls.fetch_add(1, Ordering::SeqCst);

    let prompt = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default()
        .to_string();
    let content = if prompt.contains(GARBLED_LYRICS) {
        "I would rather not use JSON today.".to_string()
    } else {
        json!({"summary": ANALYSIS_SUMMARY, "countries_mentioned": ["Italy"]}).to_string()
    };

    Json(json!({
        "id": "chatcmpl-stub",
        "object": "chat.completion",
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
    }))
    .into_response()
}

async fn models() -> Json<Value> {
    Json(json!({"object": "list", "data": [{"id": "deepseek-chat"}]}))
}

fn musixmatch_envelope(status_code: u16, available: u64, body: Value) -> Json<Value> {
    Json(json!({
        "message": {
            "header": {"status_code": status_code, "execute_time": 0.01, "available": available},
            "body": body
        }
    }))
}

async fn track_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("apikey").map(String::as_str) != Some(STUB_MUSIXMATCH_KEY) {
        return musixmatch_envelope(401, 0, json!(""));
    }
    let query = params.get("q").cloned().unwrap_or_default();
    if query == EMPTY_QUERY {
        return musixmatch_envelope(200, 0, json!({"track_list": []}));
    }
    let page_size: usize = params
        .get("page_size")
        .and_then(|p| p.parse().ok())
        .unwrap_or(10);
    let track_list: Vec<Value> = (0..page_size.min(3))
        .map(|i| {
            json!({"track": {
                "track_id": 100 + i,
                "track_name": format!("{} {}", query, i + 1),
                "artist_name": KNOWN_ARTIST,
                "album_name": "Greatest Hits",
                "has_lyrics": 1
            }})
        })
        .collect();
    musixmatch_envelope(200, 57, json!({ "track_list": track_list }))
}

async fn matcher_lyrics(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("apikey").map(String::as_str) != Some(STUB_MUSIXMATCH_KEY) {
        return musixmatch_envelope(401, 0, json!(""));
    }
    if params.get("q_artist").map(String::as_str) == Some(UNKNOWN_ARTIST) {
        return musixmatch_envelope(404, 0, json!([]));
    }
    musixmatch_envelope(
        200,
        1,
        json!({"lyrics": {
            "lyrics_id": 1,
            "lyrics_body": KNOWN_LYRICS,
            "lyrics_copyright": "Lyrics powered by www.musixmatch.com."
        }}),
    )
}

/// Running stub services, stopped on drop.
pub struct StubUpstream {
    pub base_url: String,
    pub ai_calls: Arc<AtomicUsize>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl StubUpstream {
    pub async fn spawn() -> Self {
        let ai_calls = Arc::new(AtomicUsize::new(0));
        let state = StubState {
            ai_calls: ai_calls.clone(),
        };

        let app = Router::new()
            .route("/suggest/{query}", get(suggest))
            .route("/v1/{artist}/{title}", get(lyrics_ovh))
            .route("/chat/completions", post(chat_completions))
            .route("/models", get(models))
            .route("/track.search", get(track_search))
            .route("/matcher.lyrics.get", get(matcher_lyrics))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub upstream");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Stub upstream failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            ai_calls,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn ai_call_count(&self) -> usize {
        self.ai_calls.load(Ordering::SeqCst)
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
