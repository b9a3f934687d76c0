use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Shape of the optional `--config` TOML file. Secrets are not read from
/// here, they come from the environment.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,

    pub cache: Option<CacheConfig>,
    pub ai: Option<AiConfig>,
    pub lyrics: Option<LyricsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// "redis", "memory" or "none"
    pub backend: Option<String>,
    pub redis_url: Option<String>,
    pub ttl_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AiConfig {
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LyricsConfig {
    /// "lyricsovh" or "musixmatch"
    pub source: Option<String>,
    pub lyrics_ovh_url: Option<String>,
    pub musixmatch_url: Option<String>,
    pub request_timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
