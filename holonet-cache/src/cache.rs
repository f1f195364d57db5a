//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Cache entry with TTL.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

type Entries<V> = RwLock<HashMap<String, CacheEntry<V>>>;

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied when none is given
    pub default_ttl: Duration,
    /// How often the sweep task drops expired entries
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// In-memory key/value cache with per-entry TTL.
///
/// Expired entries are never served: `get` and `has` remove them as they
/// find them, and the sweep task started by [`TtlCache::start_sweeper`]
/// drops the ones nobody reads again. There is no capacity bound.
///
/// All mutations go through a single `RwLock`, so concurrent `set`s and
/// sweeps never lose updates.
pub struct TtlCache<V> {
    entries: Arc<Entries<V>>,
    config: CacheConfig,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_config(CacheConfig {
            default_ttl,
            ..CacheConfig::default()
        })
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            config,
            sweeper: Mutex::new(None),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Gets a value if present and fresh.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => {
                    trace!(key, "Cache miss");
                    return None;
                }
                Some(entry) if !entry.is_expired() => {
                    trace!(key, "Cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        self.evict_if_expired(key);
        None
    }

    /// Returns true if a fresh value is cached under `key`.
    pub fn has(&self, key: &str) -> bool {
        let expired = match self.entries.read().get(key) {
            None => return false,
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.evict_if_expired(key);
        }
        !expired
    }

    /// Caches a value with the default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.config.default_ttl);
    }

    /// Caches a value with a custom TTL, replacing any existing entry.
    ///
    /// A zero TTL falls back to the default.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let ttl = if ttl.is_zero() { self.config.default_ttl } else { ttl };

        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "Cache set");

        self.entries.write().insert(key, CacheEntry {
            value,
            inserted_at: Instant::now(),
            ttl,
        });
    }

    /// Removes an entry. Returns true if one was present.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.entries.write().remove(key).is_some();
        if removed {
            debug!(key, "Cache delete");
        }
        removed
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let size = entries.len();
        entries.clear();
        debug!(removed = size, "Cache cleared");
    }

    /// Removes all expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge(&self.entries)
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired()).count();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();

        CacheStats {
            size: entries.len(),
            expired_entries: expired,
            keys,
        }
    }

    /// Spawns the background sweep task on the current Tokio runtime.
    ///
    /// The task only holds a weak reference to the entries and stops by
    /// itself once the cache is dropped. Calling this twice restarts it.
    /// Returns false when called outside a runtime.
    pub fn start_sweeper(&self) -> bool {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No Tokio runtime, cache sweep disabled");
            return false;
        };

        let weak = Arc::downgrade(&self.entries);
        let period = self.config.sweep_interval;
        let task = handle.spawn(sweep_loop(weak, period));

        if let Some(previous) = self.sweeper.lock().replace(task) {
            previous.abort();
        }
        debug!(interval_ms = period.as_millis() as u64, "Cache sweeper started");
        true
    }

    /// Returns true while a sweep task is attached.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stops the sweep task and clears the cache.
    pub fn shutdown(&self) {
        self.stop_sweeper();
        self.clear();
    }

    fn stop_sweeper(&self) {
        if let Some(task) = self.sweeper.lock().take() {
            task.abort();
            debug!("Cache sweeper stopped");
        }
    }

    fn evict_if_expired(&self, key: &str) {
        let mut entries = self.entries.write();
        // A concurrent set may have refreshed the entry since the read.
        if entries.get(key).is_some_and(|e| e.is_expired()) {
            entries.remove(key);
            debug!(key, "Cache expired");
        }
    }
}

impl<V> Drop for TtlCache<V> {
    fn drop(&mut self) {
        if let Some(task) = self.sweeper.get_mut().take() {
            task.abort();
        }
    }
}

fn purge<V>(entries: &Entries<V>) -> usize {
    let mut entries = entries.write();
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired());
    let removed = before - entries.len();
    if removed > 0 {
        debug!(removed, "Cache sweep");
    }
    removed
}

async fn sweep_loop<V>(entries: Weak<Entries<V>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(live) = entries.upgrade() else {
            break;
        };
        purge(&live);
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    /// Total entries (including expired)
    pub size: usize,
    /// Expired entries not yet evicted
    pub expired_entries: usize,
    /// Stored keys, sorted
    pub keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TtlCache<String> {
        TtlCache::new(Duration::from_secs(3600))
    }

    #[test]
    fn test_cache_set_get() {
        let cache = cache();
        cache.set("luke", "Luke Skywalker".to_string());
        assert_eq!(cache.get("luke").as_deref(), Some("Luke Skywalker"));
        // Reads do not consume the entry.
        assert_eq!(cache.get("luke").as_deref(), Some("Luke Skywalker"));
    }

    #[test]
    fn test_cache_miss() {
        let cache = cache();
        assert!(cache.get("nonexistent").is_none());
        assert!(!cache.has("nonexistent"));
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = cache();
        cache.set("key", "first".to_string());
        cache.set("key", "second".to_string());
        assert_eq!(cache.get("key").as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let cache = cache();
        cache.set_with_ttl("key", "value".to_string(), Duration::from_millis(50));
        assert!(cache.has("key"));

        std::thread::sleep(Duration::from_millis(100));

        assert!(cache.get("key").is_none());
        // The expired entry was evicted by the read.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_has_evicts_expired() {
        let cache = cache();
        cache.set_with_ttl("key", "value".to_string(), Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(!cache.has("key"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_zero_ttl_uses_default() {
        let cache = cache();
        cache.set_with_ttl("key", "value".to_string(), Duration::ZERO);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.has("key"));
    }

    #[test]
    fn test_cache_delete() {
        let cache = cache();
        cache.set("key", "value".to_string());
        assert!(cache.delete("key"));
        assert!(!cache.delete("key"));
        assert!(cache.get("key").is_none());
    }

    #[test]
    fn test_cache_clear() {
        let cache = cache();
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let cache = cache();
        cache.set_with_ttl("short", "x".to_string(), Duration::from_millis(1));
        cache.set("long", "y".to_string());
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.has("long"));
    }

    #[test]
    fn test_cache_stats() {
        let cache = cache();
        cache.set("b", "2".to_string());
        cache.set("a", "1".to_string());
        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.expired_entries, 0);
        assert_eq!(stats.keys, vec!["a".to_string(), "b".to_string()]);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["size"], 2);
    }

    #[test]
    fn test_start_sweeper_outside_runtime() {
        let cache = cache();
        assert!(!cache.start_sweeper());
        assert!(!cache.is_sweeping());
    }

    #[tokio::test]
    async fn test_sweeper_drops_unread_entries() {
        let cache: TtlCache<String> = TtlCache::with_config(CacheConfig {
            default_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_millis(20),
        });
        assert!(cache.start_sweeper());
        assert!(cache.is_sweeping());

        cache.set_with_ttl("abandoned", "x".to_string(), Duration::from_millis(10));
        cache.set("kept", "y".to_string());

        tokio::time::sleep(Duration::from_millis(120)).await;

        // Nobody read "abandoned"; only the sweep can have removed it.
        assert_eq!(cache.len(), 1);
        assert!(cache.has("kept"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_sweeper_and_clears() {
        let cache = cache();
        cache.start_sweeper();
        cache.set("key", "value".to_string());

        cache.shutdown();

        assert!(!cache.is_sweeping());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_sets() {
        let cache = Arc::new(TtlCache::<usize>::new(Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.set(format!("{}-{}", t, i), i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
    }
}
