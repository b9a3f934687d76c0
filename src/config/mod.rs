mod file_config;

pub use file_config::{AiConfig, CacheConfig, FileConfig, LyricsConfig};

use crate::analysis::llm::{DEEPSEEK_API_BASE, DEEPSEEK_MODEL};
use crate::cache::CacheBackend;
use crate::providers::lyrics_ovh::LYRICS_OVH_API_BASE;
use crate::providers::musixmatch::MUSIXMATCH_API_BASE;
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_CACHE_TTL_SEC: u64 = 86_400;
pub const DEFAULT_AI_TIMEOUT_SEC: u64 = 120;
pub const DEFAULT_LYRICS_TIMEOUT_SEC: u64 = 30;

/// Where lyrics come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LyricsSource {
    #[default]
    #[value(name = "lyricsovh")]
    LyricsOvh,
    Musixmatch,
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub cache_backend: CacheBackend,
    pub redis_url: Option<String>,
    pub lyrics_source: LyricsSource,
    pub deepseek_api_key: Option<String>,
    pub musixmatch_api_key: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            logging_level: RequestsLoggingLevel::Path,
            frontend_dir_path: None,
            cors_allowed_origins: Vec::new(),
            cache_backend: CacheBackend::Redis,
            redis_url: None,
            lyrics_source: LyricsSource::LyricsOvh,
            deepseek_api_key: None,
            musixmatch_api_key: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub cors_allowed_origins: Vec<String>,

    pub cache: CacheSettings,
    pub ai: AiSettings,
    pub lyrics: LyricsSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub redis_url: String,
    pub ttl_sec: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LyricsSettings {
    pub source: LyricsSource,
    pub lyrics_ovh_url: String,
    pub musixmatch_url: String,
    pub musixmatch_api_key: Option<String>,
    pub request_timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let cors_allowed_origins = file
            .cors_allowed_origins
            .unwrap_or_else(|| cli.cors_allowed_origins.clone());

        let cache_file = file.cache.unwrap_or_default();
        let cache = CacheSettings {
            backend: match cache_file.backend {
                Some(s) => CacheBackend::from_str(&s, true)
                    .map_err(|_| anyhow!("Unknown cache backend: {:?}", s))?,
                None => cli.cache_backend,
            },
            redis_url: cache_file
                .redis_url
                .or_else(|| cli.redis_url.clone())
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            ttl_sec: cache_file.ttl_sec.unwrap_or(DEFAULT_CACHE_TTL_SEC),
        };
        if cache.ttl_sec == 0 {
            bail!("Cache ttl_sec must be greater than zero");
        }

        let ai_file = file.ai.unwrap_or_default();
        let ai = AiSettings {
            api_url: ai_file
                .api_url
                .unwrap_or_else(|| DEEPSEEK_API_BASE.to_string()),
            model: ai_file.model.unwrap_or_else(|| DEEPSEEK_MODEL.to_string()),
            api_key: non_blank(cli.deepseek_api_key.clone()),
            timeout_sec: ai_file.timeout_sec.unwrap_or(DEFAULT_AI_TIMEOUT_SEC),
        };

        let lyrics_file = file.lyrics.unwrap_or_default();
        let lyrics = LyricsSettings {
            source: match lyrics_file.source {
                Some(s) => LyricsSource::from_str(&s, true)
                    .map_err(|_| anyhow!("Unknown lyrics source: {:?}", s))?,
                None => cli.lyrics_source,
            },
            lyrics_ovh_url: lyrics_file
                .lyrics_ovh_url
                .unwrap_or_else(|| LYRICS_OVH_API_BASE.to_string()),
            musixmatch_url: lyrics_file
                .musixmatch_url
                .unwrap_or_else(|| MUSIXMATCH_API_BASE.to_string()),
            musixmatch_api_key: non_blank(cli.musixmatch_api_key.clone()),
            request_timeout_sec: lyrics_file
                .request_timeout_sec
                .unwrap_or(DEFAULT_LYRICS_TIMEOUT_SEC),
        };
        if lyrics.source == LyricsSource::Musixmatch && lyrics.musixmatch_api_key.is_none() {
            bail!("The musixmatch lyrics source requires MUSIXMATCH_API_KEY");
        }

        Ok(Self {
            port,
            logging_level,
            frontend_dir_path,
            cors_allowed_origins,
            cache,
            ai,
            lyrics,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            frontend_dir_path: self.frontend_dir_path.clone(),
            cors_allowed_origins: self.cors_allowed_origins.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
