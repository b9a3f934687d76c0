//! Cache for finished lyrics analyses.
//!
//! Redis is the production backend. When it cannot be reached at startup the
//! server keeps running with caching disabled.

mod key;
mod memory_cache;
mod null_cache;
mod redis_cache;
mod trait_def;

pub use key::AnalysisCacheKey;
pub use memory_cache::InMemoryAnalysisCache;
pub use null_cache::NullAnalysisCache;
pub use redis_cache::RedisAnalysisCache;
pub use trait_def::{AnalysisCache, CacheError};

use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CacheBackend {
    Redis,
    Memory,
    None,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Builds the configured cache, falling back to [`NullAnalysisCache`] when
/// Redis does not answer.
pub async fn open_analysis_cache(
    backend: CacheBackend,
    redis_url: &str,
) -> Arc<dyn AnalysisCache> {
    match backend {
        CacheBackend::Redis => match RedisAnalysisCache::connect(redis_url).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                error!("Redis connection error: {}", e);
                warn!("Redis caching is not available, falling back to non-cached operation");
                Arc::new(NullAnalysisCache)
            }
        },
        CacheBackend::Memory => {
            info!("Using in-process analysis cache");
            Arc::new(InMemoryAnalysisCache::new())
        }
        CacheBackend::None => {
            info!("Analysis caching disabled");
            Arc::new(NullAnalysisCache)
        }
    }
}
