use super::AnalysisCacheKey;
use crate::song::LyricsAnalysis;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

/// Key/value store for finished analyses.
///
/// Expiry is the backend's business; callers only read and set.
#[async_trait]
pub trait AnalysisCache: Send + Sync {
    /// Short name reported by the server stats endpoint.
    fn backend_name(&self) -> &'static str;

    async fn get(&self, key: &AnalysisCacheKey) -> Result<Option<LyricsAnalysis>, CacheError>;

    async fn set(
        &self,
        key: &AnalysisCacheKey,
        analysis: &LyricsAnalysis,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}
