// crates/server/src/cache.rs
//! Short-lived memoization of aggregation results.
//!
//! Every dashboard render asks for the same two aggregates. Results (failures
//! included) are kept for [`RESULT_TTL`] so a burst of page loads costs one
//! query per window, and a failing database is retried at most once per TTL.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;

use echo_break_core::{CategoryCount, CommunityCount, WindowDays};
use echo_break_db::{ActivitySource, QueryFailure};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::metrics::record_cache_event;

/// How long an aggregation result is served before it is recomputed.
pub const RESULT_TTL: Duration = Duration::from_secs(60);

/// How a `get_or_load` call was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Fresh entry.
    Hit,
    /// Expired entry returned while another caller recomputes it.
    Stale,
    /// The loader ran.
    Miss,
}

impl CacheOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Stale => "stale",
            CacheOutcome::Miss => "miss",
        }
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
    refreshing: bool,
}

type Entries<K, V> = RwLock<HashMap<K, Entry<V>>>;

fn write<K, V>(entries: &Entries<K, V>) -> RwLockWriteGuard<'_, HashMap<K, Entry<V>>> {
    entries.write().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the `refreshing` mark if a loader is dropped before it finishes.
struct RefreshGuard<'a, K: Eq + Hash, V> {
    entries: &'a Entries<K, V>,
    key: K,
}

impl<K: Eq + Hash, V> Drop for RefreshGuard<'_, K, V> {
    fn drop(&mut self) {
        if let Some(entry) = write(self.entries).get_mut(&self.key) {
            entry.refreshing = false;
        }
    }
}

/// A keyed cache whose entries expire `ttl` after they were stored.
///
/// Uses `std::sync::RwLock`; the lock is never held across an `.await`, so
/// loaders run without blocking readers of other keys. While one caller
/// recomputes an expired entry, others are served the expired value.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Entries<K, V>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value for `key`, if it has not expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        write(&self.entries).insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
                refreshing: false,
            },
        );
    }

    pub fn invalidate(&self, key: &K) {
        write(&self.entries).remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached value for `key`, running `load` if it is missing
    /// or expired.
    pub async fn get_or_load<F, Fut>(&self, key: K, load: F) -> (V, CacheOutcome)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        {
            let mut entries = write(&self.entries);
            if let Some(entry) = entries.get_mut(&key) {
                if entry.stored_at.elapsed() < self.ttl {
                    return (entry.value.clone(), CacheOutcome::Hit);
                }
                if entry.refreshing {
                    return (entry.value.clone(), CacheOutcome::Stale);
                }
                entry.refreshing = true;
            }
        }

        let _guard = RefreshGuard {
            entries: &self.entries,
            key: key.clone(),
        };
        let value = load().await;
        self.insert(key, value.clone());
        (value, CacheOutcome::Miss)
    }
}

// ============================================================================
// AggregateCache
// ============================================================================

type Cached<T> = Result<Vec<T>, QueryFailure>;

/// The dashboard's view of the activity source: one TTL cache per query,
/// keyed by window.
pub struct AggregateCache {
    source: Arc<dyn ActivitySource>,
    categories: TtlCache<WindowDays, Cached<CategoryCount>>,
    communities: TtlCache<WindowDays, Cached<CommunityCount>>,
}

impl AggregateCache {
    pub fn new(source: Arc<dyn ActivitySource>) -> Self {
        Self::with_ttl(source, RESULT_TTL)
    }

    pub fn with_ttl(source: Arc<dyn ActivitySource>, ttl: Duration) -> Self {
        Self {
            source,
            categories: TtlCache::new(ttl),
            communities: TtlCache::new(ttl),
        }
    }

    /// Stored results across both queries, fresh or stale.
    pub fn cached_entries(&self) -> usize {
        self.categories.len() + self.communities.len()
    }

    pub async fn category_distribution(&self, window: WindowDays) -> Cached<CategoryCount> {
        let (result, outcome) = self
            .categories
            .get_or_load(window, || self.source.category_distribution(window))
            .await;
        observe("category_distribution", window, outcome, &result);
        result
    }

    pub async fn top_communities(&self, window: WindowDays) -> Cached<CommunityCount> {
        let (result, outcome) = self
            .communities
            .get_or_load(window, || self.source.top_communities(window))
            .await;
        observe("top_communities", window, outcome, &result);
        result
    }
}

fn observe<T>(query: &'static str, window: WindowDays, outcome: CacheOutcome, result: &Cached<T>) {
    record_cache_event(query, outcome.as_str());
    match (outcome, result) {
        (CacheOutcome::Miss, Err(e)) => {
            warn!(query, window = %window, error = %e, "Aggregation query failed")
        }
        _ => debug!(query, window = %window, outcome = outcome.as_str(), "Aggregate served"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubSource;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    fn thirty() -> WindowDays {
        WindowDays::new(30).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_load_hits_within_ttl() {
        let cache: TtlCache<&str, u32> = TtlCache::new(RESULT_TTL);

        let (first, outcome) = cache.get_or_load("k", || async { 1 }).await;
        assert_eq!((first, outcome), (1, CacheOutcome::Miss));

        tokio::time::advance(Duration::from_secs(59)).await;
        let (second, outcome) = cache.get_or_load("k", || async { 2 }).await;
        assert_eq!((second, outcome), (1, CacheOutcome::Hit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_load_reloads_after_ttl() {
        let cache: TtlCache<&str, u32> = TtlCache::new(RESULT_TTL);
        cache.get_or_load("k", || async { 1 }).await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get(&"k"), None);

        let (value, outcome) = cache.get_or_load("k", || async { 2 }).await;
        assert_eq!((value, outcome), (2, CacheOutcome::Miss));
        assert_eq!(cache.get(&"k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_served_while_refreshing() {
        let cache: TtlCache<&str, u32> = TtlCache::new(RESULT_TTL);
        cache.insert("k", 1);
        tokio::time::advance(Duration::from_secs(61)).await;

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let slow = cache.get_or_load("k", || async move {
            rx.await.ok();
            2
        });
        let fast = async {
            let served = cache.get_or_load("k", || async { 3 }).await;
            tx.send(()).ok();
            served
        };

        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(slow, (2, CacheOutcome::Miss));
        assert_eq!(fast, (1, CacheOutcome::Stale));
        assert_eq!(cache.get(&"k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_loader_releases_refresh() {
        let cache: TtlCache<&str, u32> = TtlCache::new(RESULT_TTL);
        cache.insert("k", 1);
        tokio::time::advance(Duration::from_secs(61)).await;

        {
            let pending = cache.get_or_load("k", std::future::pending::<u32>);
            let timed_out = tokio::time::timeout(Duration::from_secs(1), pending).await;
            assert!(timed_out.is_err());
        }

        let (value, outcome) = cache.get_or_load("k", || async { 5 }).await;
        assert_eq!((value, outcome), (5, CacheOutcome::Miss));
    }

    #[test]
    fn test_invalidate_and_len() {
        let cache: TtlCache<u8, u8> = TtlCache::new(RESULT_TTL);
        assert!(cache.is_empty());
        cache.insert(1, 10);
        cache.insert(2, 20);
        assert_eq!(cache.len(), 2);
        cache.invalidate(&1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.ttl(), RESULT_TTL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aggregate_cache_queries_source_once_per_ttl() {
        let source = Arc::new(StubSource::live(
            vec![CategoryCount::new("left", 3, 2)],
            vec![CommunityCount::new("politics", 3)],
        ));
        let cache = AggregateCache::new(source.clone());

        let first = cache.category_distribution(thirty()).await.unwrap();
        let second = cache.category_distribution(thirty()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(source.category_calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        cache.category_distribution(thirty()).await.unwrap();
        assert_eq!(source.category_calls.load(Ordering::SeqCst), 2);

        cache.top_communities(thirty()).await.unwrap();
        cache.top_communities(thirty()).await.unwrap();
        assert_eq!(source.community_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aggregate_cache_keys_by_window() {
        let source = Arc::new(StubSource::live(vec![], vec![]));
        let cache = AggregateCache::new(source.clone());
        assert_eq!(cache.cached_entries(), 0);

        cache.category_distribution(thirty()).await.unwrap();
        cache
            .category_distribution(WindowDays::new(7).unwrap())
            .await
            .unwrap();
        cache.top_communities(thirty()).await.unwrap();
        assert_eq!(source.category_calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.cached_entries(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aggregate_cache_remembers_failures() {
        let source = Arc::new(StubSource::failing());
        let cache = AggregateCache::new(source.clone());

        assert!(cache.category_distribution(thirty()).await.is_err());
        assert!(cache.category_distribution(thirty()).await.is_err());
        assert_eq!(source.category_calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.category_distribution(thirty()).await.is_err());
        assert_eq!(source.category_calls.load(Ordering::SeqCst), 2);
    }
}
