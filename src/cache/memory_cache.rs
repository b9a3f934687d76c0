//! In-process analysis cache with per-entry expiry.
//!
//! Used for local development without Redis and in tests. Expired entries
//! are dropped when read and swept on every write.

use super::{AnalysisCache, AnalysisCacheKey, CacheError};
use crate::song::LyricsAnalysis;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    expires_at: Instant,
    analysis: LyricsAnalysis,
}

#[derive(Default)]
pub struct InMemoryAnalysisCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryAnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::Backend("in-memory cache lock poisoned".to_string())
}

#[async_trait]
impl AnalysisCache for InMemoryAnalysisCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &AnalysisCacheKey) -> Result<Option<LyricsAnalysis>, CacheError> {
        let storage_key = key.storage_key();
        let mut entries = self.entries.lock().map_err(poisoned)?;
        match entries.get(&storage_key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.analysis.clone())),
            Some(_) => {
                entries.remove(&storage_key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &AnalysisCacheKey,
        analysis: &LyricsAnalysis,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.storage_key(),
            Entry {
                expires_at: now + ttl,
                analysis: analysis.clone(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> LyricsAnalysis {
        LyricsAnalysis {
            summary: "A song about leaving home".to_string(),
            countries_mentioned: vec!["Ireland".to_string()],
        }
    }

    #[tokio::test]
    async fn returns_what_was_set() {
        let cache = InMemoryAnalysisCache::new();
        let key = AnalysisCacheKey::new("Track", "Artist");

        assert!(cache.get(&key).await.unwrap().is_none());
        cache
            .set(&key, &analysis(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(analysis()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn lookup_ignores_case() {
        let cache = InMemoryAnalysisCache::new();
        cache
            .set(
                &AnalysisCacheKey::new("Track", "Artist"),
                &analysis(),
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let hit = cache
            .get(&AnalysisCacheKey::new("  TRACK", "artist "))
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn expired_entries_are_dropped() {
        let cache = InMemoryAnalysisCache::new();
        let key = AnalysisCacheKey::new("Track", "Artist");
        cache.set(&key, &analysis(), Duration::ZERO).await.unwrap();

        assert!(cache.get(&key).await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn writes_sweep_expired_entries() {
        let cache = InMemoryAnalysisCache::new();
        for track in ["One", "Two", "Three"] {
            cache
                .set(
                    &AnalysisCacheKey::new(track, "Artist"),
                    &analysis(),
                    Duration::ZERO,
                )
                .await
                .unwrap();
        }

        let live = AnalysisCacheKey::new("Four", "Artist");
        cache
            .set(&live, &analysis(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&live).await.unwrap().is_some());
    }
}
