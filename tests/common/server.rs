//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own collaborators and cache.

use super::constants::*;
use super::fakes::{CountingLlm, FakeLyrics, FakeSongSearch, FakeTrackCatalog};
use lyriclens_server::analysis::llm::LlmProvider;
use lyriclens_server::analysis::LyricsAnalyzer;
use lyriclens_server::cache::{AnalysisCache, InMemoryAnalysisCache, NullAnalysisCache};
use lyriclens_server::providers::{LyricsProvider, SongSearchProvider, TrackCatalog};
use lyriclens_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Everything the app talks to, swappable per test.
pub struct TestCollaborators {
    pub song_search: Arc<dyn SongSearchProvider>,
    pub lyrics_provider: Arc<dyn LyricsProvider>,
    pub track_catalog: Option<Arc<dyn TrackCatalog>>,
    pub llm: Arc<dyn LlmProvider>,
    pub cache: Arc<dyn AnalysisCache>,
}

impl TestCollaborators {
    /// In-process fakes with an in-memory cache. Returns the LLM call counter.
    pub fn fakes() -> (Self, Arc<AtomicUsize>) {
        let llm_calls = Arc::new(AtomicUsize::new(0));
        let collaborators = Self {
            song_search: Arc::new(FakeSongSearch),
            lyrics_provider: Arc::new(FakeLyrics),
            track_catalog: Some(Arc::new(FakeTrackCatalog)),
            llm: Arc::new(CountingLlm {
                calls: llm_calls.clone(),
            }),
            cache: Arc::new(InMemoryAnalysisCache::new()),
        };
        (collaborators, llm_calls)
    }
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        requests_logging_level: RequestsLoggingLevel::None,
        frontend_dir_path: None,
        cors_allowed_origins: Vec::new(),
    }
}

/// Test server instance bound to a random port
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    llm_calls: Arc<AtomicUsize>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server backed by fakes and an in-memory analysis cache.
    pub async fn spawn() -> Self {
        let (collaborators, llm_calls) = TestCollaborators::fakes();
        Self::spawn_with(collaborators, test_server_config(), llm_calls).await
    }

    /// Same as [`TestServer::spawn`] but with caching disabled.
    pub async fn spawn_without_cache() -> Self {
        let (mut collaborators, llm_calls) = TestCollaborators::fakes();
        collaborators.cache = Arc::new(NullAnalysisCache);
        Self::spawn_with(collaborators, test_server_config(), llm_calls).await
    }

    /// Spawns a server with explicit collaborators and config.
    ///
    /// # Panics
    ///
    /// Panics if the port cannot be bound or the server doesn't become
    /// ready within [`SERVER_READY_TIMEOUT_MS`].
    pub async fn spawn_with(
        collaborators: TestCollaborators,
        config: ServerConfig,
        llm_calls: Arc<AtomicUsize>,
    ) -> Self {
        let analyzer = Arc::new(LyricsAnalyzer::new(
            collaborators.llm,
            collaborators.cache,
            Duration::from_secs(60),
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let app = make_app(
            ServerConfig { port, ..config },
            collaborators.song_search,
            collaborators.lyrics_provider,
            collaborators.track_catalog,
            analyzer,
        )
        .expect("Failed to build app");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            llm_calls,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Number of completions the fake LLM has produced so far.
    pub fn llm_call_count(&self) -> usize {
        self.llm_calls.load(Ordering::SeqCst)
    }

    /// Waits for the server to accept connections by polling a cheap route
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            // Any HTTP answer means the listener is up; `/` may be a static
            // file fallback that 404s.
            match client
                .get(format!("{}/api/song/search", self.base_url))
                .send()
                .await
            {
                Ok(_) => return,
                Err(_) => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
