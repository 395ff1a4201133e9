// Ephemeral TTL caching in front of a league provider.

use std::hash::Hash;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use roundup_core::draft::DraftSelection;
use roundup_core::league::BoxScore;
use tokio::time::Instant;
use tracing::debug;

use crate::provider::{LeagueProvider, LeagueSnapshot, ProviderError};

// ---------------------------------------------------------------------------
// TtlCache
// ---------------------------------------------------------------------------

/// Concurrent map whose entries expire `ttl` after insertion.
///
/// Expired entries are dropped lazily on lookup.
pub struct TtlCache<K, V> {
    entries: DashMap<K, (Instant, V)>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        let (stored_at, value) = entry.value();
        if stored_at.elapsed() < self.ttl {
            return Some(value.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, (Instant::now(), value));
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included until next touched.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CachedProvider
// ---------------------------------------------------------------------------

/// Provider decorator serving repeat requests from memory.
///
/// Only successful responses are stored; errors always reach the caller and
/// the next request retries the inner provider.
pub struct CachedProvider<P> {
    inner: P,
    league: TtlCache<(), LeagueSnapshot>,
    weeks: TtlCache<u32, Vec<BoxScore>>,
    draft: TtlCache<(), Vec<DraftSelection>>,
}

impl<P: LeagueProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            league: TtlCache::new(ttl),
            weeks: TtlCache::new(ttl),
            draft: TtlCache::new(ttl),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drop every cached response.
    pub fn clear(&self) {
        self.league.clear();
        self.weeks.clear();
        self.draft.clear();
    }
}

#[async_trait]
impl<P: LeagueProvider> LeagueProvider for CachedProvider<P> {
    async fn league(&self) -> Result<LeagueSnapshot, ProviderError> {
        if let Some(hit) = self.league.get(&()) {
            debug!("league cache hit");
            return Ok(hit);
        }
        let snapshot = self.inner.league().await?;
        self.league.insert((), snapshot.clone());
        Ok(snapshot)
    }

    async fn box_scores(&self, week: u32) -> Result<Vec<BoxScore>, ProviderError> {
        if let Some(hit) = self.weeks.get(&week) {
            debug!(week, "box score cache hit");
            return Ok(hit);
        }
        let scores = self.inner.box_scores(week).await?;
        self.weeks.insert(week, scores.clone());
        Ok(scores)
    }

    async fn draft(&self) -> Result<Vec<DraftSelection>, ProviderError> {
        if let Some(hit) = self.draft.get(&()) {
            debug!("draft cache hit");
            return Ok(hit);
        }
        let selections = self.inner.draft().await?;
        self.draft.insert((), selections.clone());
        Ok(selections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache: TtlCache<u32, &str> = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, "week one");
        assert_eq!(cache.get(&1), Some("week one"));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&1), Some("week one"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get(&1), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_and_clear_remove_entries() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, 10);
        cache.insert(2, 20);

        cache.invalidate(&1);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
