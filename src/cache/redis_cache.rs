//! Redis-backed analysis cache.
//!
//! Entries are JSON strings written with `SET .. EX`, so Redis handles
//! eviction on its own.

use super::{AnalysisCache, AnalysisCacheKey, CacheError};
use crate::song::LyricsAnalysis;
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::info;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(2);
const CONNECTION_RETRIES: usize = 1;

pub struct RedisAnalysisCache {
    connection: ConnectionManager,
}

impl RedisAnalysisCache {
    /// Opens a managed connection and verifies it with a PING.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(CONNECTION_TIMEOUT)
            .set_number_of_retries(CONNECTION_RETRIES);
        let mut connection = ConnectionManager::new_with_config(client, config).await?;

        let pong: String = redis::cmd("PING").query_async(&mut connection).await?;
        info!("Redis connection successful ({}), caching enabled", pong);

        Ok(Self { connection })
    }
}

#[async_trait]
impl AnalysisCache for RedisAnalysisCache {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &AnalysisCacheKey) -> Result<Option<LyricsAnalysis>, CacheError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.get(key.storage_key()).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &AnalysisCacheKey,
        analysis: &LyricsAnalysis,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let raw = serde_json::to_string(analysis)?;
        let mut connection = self.connection.clone();
        let _: () = connection
            .set_ex(key.storage_key(), raw, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }
}
