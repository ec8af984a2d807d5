//! In-Memory Key-Value Cache
//!
//! Whole-map reader/writer lock over a hashmap of TTL-tagged entries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::storage::entry::Entry;
use crate::storage::ttl::TtlSweeper;

/// Shared state behind every `Cache` handle
pub(crate) struct CacheInner<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    default_ttl: Duration,
    /// Total `set` calls over the cache's lifetime, diagnostic only
    insertions: AtomicU64,
    /// Sender half of the sweeper shutdown signal
    shutdown_tx: watch::Sender<bool>,
}

impl<V> CacheInner<V> {
    /// Removes every expired entry, returns the removed count.
    ///
    /// Two phases: collect expired keys under the read lock, then delete
    /// them under the write lock. The exclusive lock is held only for the
    /// removals, never for the full-map scan.
    pub(crate) fn sweep(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = {
            let entries = self.entries.read();
            entries
                .iter()
                .filter(|(_, entry)| entry.is_expired_at(now))
                .map(|(key, _)| key.clone())
                .collect()
        };

        if expired.is_empty() {
            return 0;
        }

        // No expiry re-check between the phases: a key reinserted with a
        // fresh TTL after the scan is removed along with the rest. Writers
        // racing a sweep win or lose on write-lock order alone.
        let mut entries = self.entries.write();
        expired
            .into_iter()
            .filter(|key| entries.remove(key).is_some())
            .count()
    }
}

impl<V> Drop for CacheInner<V> {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Thread-safe in-memory key-value cache with per-entry TTL
///
/// A single reader/writer lock guards the whole map: reads run concurrently
/// with each other, writes are exclusive. Expired entries are hidden from
/// reads immediately (lazy expiration) and physically removed by a
/// background sweeper spawned at construction.
///
/// The handle is cheap to clone; all clones share one map and one sweeper.
///
/// # Example
///
/// ```rust,no_run
/// use memvault::{Cache, CacheConfig};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = CacheConfig::default()
///         .with_default_ttl(Duration::from_secs(300))
///         .with_sweep_interval(Duration::from_secs(30));
///     let cache = Cache::with_config(config);
///
///     cache.set("user:42", "profile");
///     cache.set_with_ttl("session:9", "token", Some(Duration::from_secs(60)));
///     assert_eq!(cache.get("user:42"), Some("profile"));
/// }
/// ```
pub struct Cache<V> {
    inner: Arc<CacheInner<V>>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache with the default configuration
    ///
    /// # Panics
    ///
    /// Panics outside a Tokio runtime context, since the default
    /// configuration enables the background sweeper. See [`Self::with_config`].
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with the given configuration
    ///
    /// When `config.sweep_interval` is set, the background sweeper is
    /// spawned immediately and runs until [`Self::close`] is called or the
    /// last handle is dropped.
    ///
    /// # Panics
    ///
    /// Panics if sweeping is enabled and no Tokio runtime is available.
    /// Construct the cache inside a runtime, or disable the sweeper with
    /// [`CacheConfig::without_sweeper`] to rely on lazy expiration alone.
    pub fn with_config(config: CacheConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let inner = Arc::new(CacheInner {
            entries: RwLock::new(HashMap::new()),
            default_ttl: config.default_ttl,
            insertions: AtomicU64::new(0),
            shutdown_tx,
        });

        // A zero interval disables sweeping, same as not configuring one.
        if let Some(interval) = config.sweep_interval.filter(|i| !i.is_zero()) {
            if tokio::runtime::Handle::try_current().is_err() {
                panic!(
                    "memvault::Cache requires a Tokio runtime when background \
                     sweeping is enabled; construct the cache inside a runtime \
                     or disable the sweeper via CacheConfig::without_sweeper()"
                );
            }
            TtlSweeper::spawn(Arc::downgrade(&inner), interval, shutdown_rx);
        }

        Self { inner }
    }

    /// Inserts or overwrites `key` using the configured default TTL
    ///
    /// With a zero default TTL the entry never expires.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.insert_entry(key.into(), value, self.inner.default_ttl);
    }

    /// Inserts or overwrites `key` with an explicit TTL
    ///
    /// `Some(d)` expires the entry `d` from now; `None` or a zero duration
    /// makes it permanent regardless of the configured default. Overwriting
    /// replaces the prior entry in full: value, creation time, and expiry.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.insert_entry(key.into(), value, ttl.unwrap_or(Duration::ZERO));
    }

    fn insert_entry(&self, key: String, value: V, ttl: Duration) {
        let ttl = (!ttl.is_zero()).then_some(ttl);
        let entry = Entry::new(value, ttl);
        {
            let mut entries = self.inner.entries.write();
            entries.insert(key, entry);
        }
        self.inner.insertions.fetch_add(1, Ordering::Relaxed);
    }

    /// Retrieves the value for `key`
    ///
    /// Returns `None` for absent and for expired keys; the two are
    /// indistinguishable to callers. An expired entry is not removed here,
    /// the read stays under the shared lock and physical removal is the
    /// sweeper's job.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.inner.entries.read();
        entries.get(key).and_then(|entry| {
            if entry.is_expired() {
                None
            } else {
                Some(entry.value().clone())
            }
        })
    }

    /// Returns every unexpired key/value pair in a fresh map
    ///
    /// Expiration is judged per entry against a single instant taken at
    /// call time. The returned map is independent of the cache; mutating it
    /// changes nothing here.
    pub fn get_all(&self) -> std::collections::HashMap<String, V> {
        let now = Instant::now();
        let entries = self.inner.entries.read();
        entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, entry)| (key.clone(), entry.value().clone()))
            .collect()
    }

    /// Removes `key` from the cache
    ///
    /// An expired-but-unswept entry is still physically present and removes
    /// successfully.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::KeyNotFound`] if the key is absent.
    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.inner.entries.write();
        match entries.remove(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::KeyNotFound(key.to_string())),
        }
    }

    /// Checks if `key` exists and is not expired
    pub fn contains_key(&self, key: &str) -> bool {
        let entries = self.inner.entries.read();
        entries.get(key).map(|e| !e.is_expired()).unwrap_or(false)
    }

    /// Returns all unexpired keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let entries = self.inner.entries.read();
        entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of physically present entries, including expired ones not
    /// yet swept
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Checks if the cache holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Removes every expired entry now, returns the removed count
    ///
    /// Same pass the background sweeper runs on its interval.
    pub fn purge_expired(&self) -> usize {
        self.inner.sweep()
    }

    /// Total `set` calls since construction, overwrites included
    pub fn insertions(&self) -> u64 {
        self.inner.insertions.load(Ordering::Relaxed)
    }

    /// Stops the background sweeper
    ///
    /// Idempotent; safe to call any number of times, or never. Dropping the
    /// last handle stops the sweeper too. Entries stay readable after
    /// closing, but expired ones are no longer reclaimed.
    pub fn close(&self) {
        let _ = self.inner.shutdown_tx.send(true);
    }
}
