//! Tag-invalidated query cache.
//!
//! Query results are stored as JSON under a structured [`QueryKey`] and
//! labeled with the [`Tag`]s the query provides. Mutations call
//! [`TagCache::invalidate`] with their declared tag set: every entry whose
//! tags intersect goes stale and the key's live subscribers are notified so
//! they can re-run their query. A stale entry reads as a miss, which is what
//! makes the next query refetch over the network.
//!
//! ## Design
//!
//! - **Cache key**: endpoint name plus its rendered argument
//! - **Cache value**: the decoded response payload as `serde_json::Value`
//! - **Concurrent access**: `DashMap`, no global lock
//! - **Eviction**: invalidation-driven only; entries never expire by age

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;
use warden_core::{Tag, tags_intersect};

/// Buffer size for per-key subscriber channels.
const SUBSCRIBER_BUFFER_SIZE: usize = 16;

/// Identity of a cached query: the endpoint plus its rendered argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    endpoint: &'static str,
    param: Option<String>,
}

impl QueryKey {
    /// Key for a parameterless query.
    #[must_use]
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            param: None,
        }
    }

    /// Key for a query with one rendered argument.
    #[must_use]
    pub fn with_param(endpoint: &'static str, param: impl Into<String>) -> Self {
        Self {
            endpoint,
            param: Some(param.into()),
        }
    }

    /// Returns the endpoint name.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}({param})", self.endpoint),
            None => f.write_str(self.endpoint),
        }
    }
}

/// Notice sent to a key's subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNotice {
    /// The entry went stale; re-running the query will refetch.
    Invalidated,
    /// A fresh value was stored for the key.
    Updated,
}

/// One cached result with the tags it provides.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    tags: Vec<Tag>,
    stale: bool,
}

/// Cache statistics counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of fresh-entry reads.
    pub hits: AtomicU64,
    /// Number of absent-or-stale reads.
    pub misses: AtomicU64,
    /// Number of stored results.
    pub insertions: AtomicU64,
    /// Number of entries marked stale.
    pub invalidations: AtomicU64,
    /// Current number of entries (fresh and stale).
    pub size: AtomicUsize,
}

impl CacheStats {
    /// Fraction of reads answered from cache.
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;

        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Takes a point-in-time snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            size: self.size.load(Ordering::Relaxed),
            hit_ratio: self.hit_ratio(),
        }
    }
}

/// A point-in-time snapshot of cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub invalidations: u64,
    pub size: usize,
    pub hit_ratio: f64,
}

/// Thread-safe result cache with tag-driven invalidation.
pub struct TagCache {
    entries: DashMap<QueryKey, CacheEntry>,
    subscribers: DashMap<QueryKey, broadcast::Sender<CacheNotice>>,
    stats: Arc<CacheStats>,
}

impl fmt::Debug for TagCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagCache")
            .field("size", &self.entries.len())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

impl TagCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            subscribers: DashMap::new(),
            stats: Arc::new(CacheStats::default()),
        }
    }

    /// Reads a fresh entry. Stale and absent entries both read as a miss.
    #[must_use]
    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        if let Some(entry) = self.entries.get(key)
            && !entry.stale
        {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Some(entry.value.clone());
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores a result under its key with the tags the query provides.
    pub fn insert(&self, key: QueryKey, value: Value, tags: Vec<Tag>) {
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                tags,
                stale: false,
            },
        );
        self.stats.insertions.fetch_add(1, Ordering::Relaxed);
        self.stats.size.store(self.entries.len(), Ordering::Relaxed);
        self.notify(&key, CacheNotice::Updated);
    }

    /// Marks every entry whose tags intersect `tags` as stale and notifies
    /// that key's subscribers, if it has any. Returns the number of entries
    /// that went stale.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        if tags.is_empty() {
            return 0;
        }

        let mut touched = Vec::new();
        for mut entry in self.entries.iter_mut() {
            if !entry.stale && tags_intersect(&entry.tags, tags) {
                entry.stale = true;
                touched.push(entry.key().clone());
            }
        }

        self.stats
            .invalidations
            .fetch_add(touched.len() as u64, Ordering::Relaxed);

        for key in &touched {
            debug!(key = %key, "cache entry invalidated");
            self.notify(key, CacheNotice::Invalidated);
        }

        touched.len()
    }

    /// Drops one entry outright, forcing the next query to refetch.
    pub fn remove(&self, key: &QueryKey) {
        self.entries.remove(key);
        self.stats.size.store(self.entries.len(), Ordering::Relaxed);
        self.notify(key, CacheNotice::Invalidated);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let keys: Vec<QueryKey> = self.entries.iter().map(|e| e.key().clone()).collect();
        self.entries.clear();
        self.stats.size.store(0, Ordering::Relaxed);
        for key in &keys {
            self.notify(key, CacheNotice::Invalidated);
        }
    }

    /// Subscribes to change notices for one key.
    #[must_use]
    pub fn subscribe(&self, key: QueryKey) -> CacheSubscription {
        let receiver = self
            .subscribers
            .entry(key.clone())
            .or_insert_with(|| broadcast::channel(SUBSCRIBER_BUFFER_SIZE).0)
            .subscribe();
        CacheSubscription { key, receiver }
    }

    /// Takes a snapshot of the cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Current number of entries, fresh and stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn notify(&self, key: &QueryKey, notice: CacheNotice) {
        let Some(sender) = self.subscribers.get(key) else {
            return;
        };

        if sender.receiver_count() == 0 {
            // Every subscription for this key was dropped; reclaim the slot.
            drop(sender);
            self.subscribers
                .remove_if(key, |_, sender| sender.receiver_count() == 0);
            return;
        }

        let _ = sender.send(notice);
    }
}

impl Default for TagCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to one query key.
///
/// Dropping the subscription unregisters it; a key with no live
/// subscriptions produces no notification work at all.
pub struct CacheSubscription {
    key: QueryKey,
    receiver: broadcast::Receiver<CacheNotice>,
}

impl CacheSubscription {
    /// The key this subscription watches.
    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Waits for the next notice for this key.
    ///
    /// Returns `None` when the cache side of the channel is gone. A lagged
    /// receiver skips forward; for staleness tracking, missed intermediate
    /// notices are harmless.
    pub async fn changed(&mut self) -> Option<CacheNotice> {
        loop {
            match self.receiver.recv().await {
                Ok(notice) => return Some(notice),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use warden_core::ResourceKind;

    fn users_list_key() -> QueryKey {
        QueryKey::new("users.list")
    }

    #[test]
    fn test_insert_and_get() {
        let cache = TagCache::new();
        let key = users_list_key();

        cache.insert(
            key.clone(),
            json!([{"id": 1}]),
            vec![Tag::id(ResourceKind::User, 1), Tag::list(ResourceKind::User)],
        );

        assert_eq!(cache.get(&key), Some(json!([{"id": 1}])));
        assert_eq!(cache.len(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.insertions, 1);
    }

    #[test]
    fn test_miss_on_absent_key() {
        let cache = TagCache::new();
        assert!(cache.get(&users_list_key()).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_invalidate_marks_matching_entries_stale() {
        let cache = TagCache::new();
        cache.insert(
            users_list_key(),
            json!([{"id": 1}, {"id": 2}]),
            vec![
                Tag::id(ResourceKind::User, 1),
                Tag::id(ResourceKind::User, 2),
                Tag::list(ResourceKind::User),
            ],
        );
        cache.insert(
            QueryKey::new("roles.list"),
            json!([]),
            vec![Tag::list(ResourceKind::Role)],
        );

        let stale = cache.invalidate(&[Tag::list(ResourceKind::User)]);
        assert_eq!(stale, 1);

        // The user list is now a miss, the role list still a hit.
        assert!(cache.get(&users_list_key()).is_none());
        assert!(cache.get(&QueryKey::new("roles.list")).is_some());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_id_tag_reaches_lists_containing_the_entity() {
        let cache = TagCache::new();
        cache.insert(
            users_list_key(),
            json!([{"id": 1}, {"id": 2}]),
            vec![
                Tag::id(ResourceKind::User, 1),
                Tag::id(ResourceKind::User, 2),
                Tag::list(ResourceKind::User),
            ],
        );
        cache.insert(
            QueryKey::with_param("users.get", "2"),
            json!({"id": 2}),
            vec![Tag::id(ResourceKind::User, 2)],
        );
        cache.insert(
            QueryKey::with_param("users.get", "3"),
            json!({"id": 3}),
            vec![Tag::id(ResourceKind::User, 3)],
        );

        // An update of user 2 invalidates its own entry and the list, but
        // not user 3's entry.
        let stale = cache.invalidate(&[
            Tag::id(ResourceKind::User, 2),
            Tag::list(ResourceKind::User),
        ]);
        assert_eq!(stale, 2);
        assert!(cache.get(&users_list_key()).is_none());
        assert!(cache.get(&QueryKey::with_param("users.get", "2")).is_none());
        assert!(cache.get(&QueryKey::with_param("users.get", "3")).is_some());
    }

    #[test]
    fn test_invalidate_already_stale_entry_counts_once() {
        let cache = TagCache::new();
        cache.insert(
            users_list_key(),
            json!([]),
            vec![Tag::list(ResourceKind::User)],
        );

        assert_eq!(cache.invalidate(&[Tag::list(ResourceKind::User)]), 1);
        assert_eq!(cache.invalidate(&[Tag::list(ResourceKind::User)]), 0);
    }

    #[test]
    fn test_insert_refreshes_stale_entry() {
        let cache = TagCache::new();
        let key = users_list_key();
        cache.insert(key.clone(), json!([]), vec![Tag::list(ResourceKind::User)]);
        cache.invalidate(&[Tag::list(ResourceKind::User)]);
        assert!(cache.get(&key).is_none());

        cache.insert(
            key.clone(),
            json!([{"id": 9}]),
            vec![Tag::id(ResourceKind::User, 9), Tag::list(ResourceKind::User)],
        );
        assert_eq!(cache.get(&key), Some(json!([{"id": 9}])));
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = TagCache::new();
        cache.insert(users_list_key(), json!([]), vec![]);
        cache.insert(QueryKey::new("roles.list"), json!([]), vec![]);

        cache.remove(&users_list_key());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_sees_invalidation() {
        let cache = TagCache::new();
        cache.insert(
            users_list_key(),
            json!([]),
            vec![Tag::list(ResourceKind::User)],
        );

        let mut subscription = cache.subscribe(users_list_key());
        cache.invalidate(&[Tag::list(ResourceKind::User)]);

        assert_eq!(subscription.changed().await, Some(CacheNotice::Invalidated));
    }

    #[tokio::test]
    async fn test_subscriber_sees_fresh_insert() {
        let cache = TagCache::new();
        let mut subscription = cache.subscribe(users_list_key());

        cache.insert(
            users_list_key(),
            json!([]),
            vec![Tag::list(ResourceKind::User)],
        );

        assert_eq!(subscription.changed().await, Some(CacheNotice::Updated));
    }

    #[test]
    fn test_invalidation_without_subscribers_is_silent() {
        let cache = TagCache::new();
        cache.insert(
            users_list_key(),
            json!([]),
            vec![Tag::list(ResourceKind::User)],
        );

        {
            let _dropped = cache.subscribe(users_list_key());
        }

        // No live receivers; must not panic or accumulate senders.
        assert_eq!(cache.invalidate(&[Tag::list(ResourceKind::User)]), 1);
    }
}
