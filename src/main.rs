use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lyriclens_server::analysis::llm::{LlmProvider, OpenAIProvider};
use lyriclens_server::analysis::LyricsAnalyzer;
use lyriclens_server::cache::{open_analysis_cache, CacheBackend};
use lyriclens_server::config::{self, LyricsSource};
use lyriclens_server::providers::{
    LyricsOvhClient, LyricsProvider, MusixmatchClient, SongSearchProvider, TrackCatalog,
};
use lyriclens_server::server::{run_server, RequestsLoggingLevel};

#[derive(Parser, Debug)]
#[command(version, about = "Song search, lyrics and AI lyrics analysis server")]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI flags.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Origin allowed to call the API from a browser. Repeatable, "*" allows any.
    #[clap(long = "cors-origin")]
    pub cors_allowed_origins: Vec<String>,

    /// Where finished analyses are cached.
    #[clap(long, default_value = "redis")]
    pub cache_backend: CacheBackend,

    #[clap(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Where lyrics are fetched from.
    #[clap(long, default_value = "lyricsovh")]
    pub lyrics_source: LyricsSource,

    #[clap(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    pub deepseek_api_key: Option<String>,

    /// Enables paginated track search and the musixmatch lyrics source.
    #[clap(long, env = "MUSIXMATCH_API_KEY", hide_env_values = true)]
    pub musixmatch_api_key: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            cors_allowed_origins: args.cors_allowed_origins.clone(),
            cache_backend: args.cache_backend,
            redis_url: args.redis_url.clone(),
            lyrics_source: args.lyrics_source,
            deepseek_api_key: args.deepseek_api_key.clone(),
            musixmatch_api_key: args.musixmatch_api_key.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Must run before clap reads env fallbacks.
    if let Ok(path) = dotenv::dotenv() {
        eprintln!("Loaded environment from {:?}", path);
    }

    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  port: {}", app_config.port);
    info!("  cache: {}", app_config.cache.backend);
    info!("  lyrics source: {:?}", app_config.lyrics.source);
    info!("  ai: {} ({})", app_config.ai.model, app_config.ai.api_url);

    let lyrics_ovh = Arc::new(LyricsOvhClient::new(
        app_config.lyrics.lyrics_ovh_url.clone(),
        app_config.lyrics.request_timeout_sec,
    )?);

    let musixmatch = match &app_config.lyrics.musixmatch_api_key {
        Some(key) => Some(Arc::new(MusixmatchClient::new(
            key.clone(),
            app_config.lyrics.musixmatch_url.clone(),
            app_config.lyrics.request_timeout_sec,
        )?)),
        None => {
            info!("MUSIXMATCH_API_KEY not set, track search disabled");
            None
        }
    };

    let song_search: Arc<dyn SongSearchProvider> = lyrics_ovh.clone();
    let lyrics_provider: Arc<dyn LyricsProvider> = match (app_config.lyrics.source, &musixmatch) {
        (LyricsSource::Musixmatch, Some(client)) => client.clone(),
        _ => lyrics_ovh.clone(),
    };
    let track_catalog = musixmatch.map(|client| client as Arc<dyn TrackCatalog>);

    if app_config.ai.api_key.is_none() {
        warn!("DEEPSEEK_API_KEY not set, lyrics analysis requests will fail");
    }
    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAIProvider::new(
        app_config.ai.api_url.clone(),
        app_config.ai.model.clone(),
        app_config.ai.api_key.clone(),
    )?);

    let health_llm = llm.clone();
    tokio::spawn(async move {
        match health_llm.health_check().await {
            Ok(()) => info!("AI provider {} is reachable", health_llm.name()),
            Err(e) => warn!("AI provider {} health check failed: {}", health_llm.name(), e),
        }
    });

    let cache = open_analysis_cache(app_config.cache.backend, &app_config.cache.redis_url).await;
    info!("Analysis cache: {}", cache.backend_name());

    let analyzer = Arc::new(LyricsAnalyzer::new(
        llm,
        cache,
        Duration::from_secs(app_config.cache.ttl_sec),
        Duration::from_secs(app_config.ai.timeout_sec),
    ));

    info!("Ready to serve at port {}!", app_config.port);

    tokio::select! {
        result = run_server(
            app_config.server_config(),
            song_search,
            lyrics_provider,
            track_catalog,
            analyzer,
        ) => {
            if let Err(e) = &result {
                error!("Server stopped: {:#}", e);
            }
            result
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
