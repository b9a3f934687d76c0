//! Null analysis cache implementation.
//!
//! Stands in when caching is turned off or Redis could not be reached at
//! startup: every read misses and every write is dropped.

use super::{AnalysisCache, AnalysisCacheKey, CacheError};
use crate::song::LyricsAnalysis;
use async_trait::async_trait;
use std::time::Duration;

pub struct NullAnalysisCache;

#[async_trait]
impl AnalysisCache for NullAnalysisCache {
    fn backend_name(&self) -> &'static str {
        "disabled"
    }

    async fn get(&self, _key: &AnalysisCacheKey) -> Result<Option<LyricsAnalysis>, CacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &AnalysisCacheKey,
        _analysis: &LyricsAnalysis,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }
}
