use axum::extract::FromRef;

use crate::analysis::LyricsAnalyzer;
use crate::providers::{LyricsProvider, SongSearchProvider, TrackCatalog};
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSongSearch = Arc<dyn SongSearchProvider>;
pub type GuardedLyricsProvider = Arc<dyn LyricsProvider>;
pub type OptionalTrackCatalog = Option<Arc<dyn TrackCatalog>>;
pub type GuardedAnalyzer = Arc<LyricsAnalyzer>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub song_search: GuardedSongSearch,
    pub lyrics_provider: GuardedLyricsProvider,
    pub track_catalog: OptionalTrackCatalog,
    pub analyzer: GuardedAnalyzer,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        song_search: GuardedSongSearch,
        lyrics_provider: GuardedLyricsProvider,
        track_catalog: OptionalTrackCatalog,
        analyzer: GuardedAnalyzer,
    ) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_string(),
            song_search,
            lyrics_provider,
            track_catalog,
            analyzer,
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedSongSearch {
    fn from_ref(input: &ServerState) -> Self {
        input.song_search.clone()
    }
}

impl FromRef<ServerState> for GuardedLyricsProvider {
    fn from_ref(input: &ServerState) -> Self {
        input.lyrics_provider.clone()
    }
}

impl FromRef<ServerState> for OptionalTrackCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.track_catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedAnalyzer {
    fn from_ref(input: &ServerState) -> Self {
        input.analyzer.clone()
    }
}
