//! Song API routes: search, lyrics and analysis.

use super::error::ApiError;
use super::state::{
    GuardedAnalyzer, GuardedLyricsProvider, GuardedSongSearch, OptionalTrackCatalog, ServerState,
};
use crate::song::{Lyrics, SuggestionItem};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CACHE_STATUS_HEADER: &str = "x-analysis-cache";

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 50;

#[derive(Deserialize, Debug)]
struct SearchParams {
    query: Option<String>,
}

#[derive(Deserialize, Debug)]
struct LyricsParams {
    artist_name: Option<String>,
    track_name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TracksParams {
    query: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct AnalyzeBody {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub lyrics: Option<String>,
}

#[derive(Serialize, Debug)]
struct SuggestionsResponse {
    suggestions: Vec<SuggestionItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResponse {
    pub track_name: String,
    pub artist_name: String,
    pub summary: String,
    pub countries_mentioned: Vec<String>,
    pub countries_message: String,
}

/// Only presence is checked; values are forwarded untouched.
fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::missing_parameter(name)),
    }
}

/// Parses and clamps paging parameters the way the frontend expects:
/// oversize pages shrink to the maximum, nonsense sizes fall back to the
/// default and pages start at 1.
pub fn parse_paging(page: Option<&str>, page_size: Option<&str>) -> Result<(u32, u32), ApiError> {
    let invalid = || ApiError::BadRequest("page and page_size must be valid integers".to_string());

    let page = match page {
        Some(p) => p.trim().parse::<i64>().map_err(|_| invalid())?,
        None => DEFAULT_PAGE as i64,
    };
    let page_size = match page_size {
        Some(p) => p.trim().parse::<i64>().map_err(|_| invalid())?,
        None => DEFAULT_PAGE_SIZE as i64,
    };

    let page_size = if page_size > MAX_PAGE_SIZE as i64 {
        MAX_PAGE_SIZE
    } else if page_size < 1 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size as u32
    };
    let page = if page < 1 {
        DEFAULT_PAGE
    } else {
        u32::try_from(page).map_err(|_| invalid())?
    };

    Ok((page, page_size))
}

async fn search_songs(
    State(song_search): State<GuardedSongSearch>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let query = required(params.query, "query")?;
    let suggestions = song_search.suggest(&query).await?;
    debug!(
        "{} returned {} suggestions for {:?}",
        song_search.name(),
        suggestions.len(),
        query
    );
    Ok(Json(SuggestionsResponse { suggestions }))
}

async fn get_lyrics(
    State(lyrics_provider): State<GuardedLyricsProvider>,
    Query(params): Query<LyricsParams>,
) -> Result<Json<Lyrics>, ApiError> {
    let track_name = required(params.track_name, "track_name")?;
    let artist_name = required(params.artist_name, "artist_name")?;
    let lyrics = lyrics_provider.lyrics(&artist_name, &track_name).await?;
    debug!(
        "{} returned {} bytes of lyrics for {:?} by {:?}",
        lyrics_provider.name(),
        lyrics.lyrics.len(),
        track_name,
        artist_name
    );
    Ok(Json(lyrics))
}

async fn search_tracks(
    State(track_catalog): State<OptionalTrackCatalog>,
    Query(params): Query<TracksParams>,
) -> Result<Response, ApiError> {
    let Some(track_catalog) = track_catalog else {
        return Err(ApiError::Upstream(
            "Track search is not configured".to_string(),
        ));
    };
    let query = required(params.query, "query")?;
    let (page, page_size) = parse_paging(params.page.as_deref(), params.page_size.as_deref())?;
    let track_page = track_catalog.search_tracks(&query, page, page_size).await?;
    Ok(Json(track_page).into_response())
}

async fn analyze_lyrics(
    State(analyzer): State<GuardedAnalyzer>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let track_name = required(body.track_name, "track_name")?;
    let artist_name = required(body.artist_name, "artist_name")?;
    let lyrics = required(body.lyrics, "lyrics")?;

    let outcome = analyzer.analyze(&track_name, &artist_name, &lyrics).await?;
    let countries_message = outcome.analysis.countries_message();

    let mut response = Json(AnalysisResponse {
        track_name,
        artist_name,
        summary: outcome.analysis.summary,
        countries_mentioned: outcome.analysis.countries_mentioned,
        countries_message,
    })
    .into_response();
    response.headers_mut().insert(
        CACHE_STATUS_HEADER,
        HeaderValue::from_static(if outcome.cached { "hit" } else { "miss" }),
    );
    Ok(response)
}

/// Routes nested under `/api`. `/song/tracks` is only mounted when a track
/// catalog is configured.
pub fn make_song_routes(state: ServerState) -> Router {
    let mut router = Router::new()
        .route("/song/search", get(search_songs))
        .route("/song/lyrics", get(get_lyrics))
        .route("/song/analyze", post(analyze_lyrics));

    if state.track_catalog.is_some() {
        router = router.route("/song/tracks", get(search_tracks));
    }

    router.with_state(state)
}
