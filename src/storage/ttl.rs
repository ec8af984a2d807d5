//! TTL Sweeper
//!
//! Background task that periodically removes expired entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info};

use super::store::CacheInner;

/// Background expiry reclamation task
///
/// Holds only a weak back-reference to the cache: the task cannot keep the
/// cache alive, and exits on its own once the last handle is gone. A close
/// signal over the watch channel ends it immediately instead of at the next
/// tick.
pub(crate) struct TtlSweeper<V> {
    inner: Weak<CacheInner<V>>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl<V> TtlSweeper<V>
where
    V: Send + Sync + 'static,
{
    fn new(
        inner: Weak<CacheInner<V>>,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            inner,
            interval,
            shutdown_rx,
        }
    }

    /// Spawn the sweeper on the current runtime
    pub(crate) fn spawn(
        inner: Weak<CacheInner<V>>,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(Self::new(inner, interval, shutdown_rx).run())
    }

    async fn run(self) {
        let TtlSweeper {
            inner,
            interval: period,
            mut shutdown_rx,
        } = self;

        info!(interval = ?period, "TTL sweeper started");

        let mut ticker = interval(period);
        // The first tick completes immediately; wait a full period instead.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(cache) = inner.upgrade() else {
                        break;
                    };
                    let removed = cache.sweep();
                    if removed > 0 {
                        debug!(removed, "swept expired entries");
                    }
                }
                changed = shutdown_rx.changed() => {
                    // A dropped sender means the cache itself is gone.
                    match changed {
                        Ok(()) if !*shutdown_rx.borrow() => continue,
                        _ => break,
                    }
                }
            }
        }

        debug!("TTL sweeper stopped");
    }
}

#[cfg(test)]
mod tests {
    use crate::config::CacheConfig;
    use crate::storage::Cache;
    use std::time::Duration;

    /// Opt-in log output for debugging these tests: RUST_LOG=memvault=debug
    fn init_logs() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    #[tokio::test]
    async fn test_background_sweep_removes_expired() {
        init_logs();
        let config = CacheConfig::default().with_sweep_interval(Duration::from_millis(20));
        let cache = Cache::with_config(config);

        cache.set_with_ttl("gone1", "a", Some(Duration::from_millis(1)));
        cache.set_with_ttl("gone2", "b", Some(Duration::from_millis(1)));
        cache.set_with_ttl("keep", "c", Some(Duration::from_secs(60)));
        cache.set("forever", "d");

        // All four physically present until the sweeper runs
        assert_eq!(cache.len(), 4);

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("keep"), Some("c"));
        assert_eq!(cache.get("forever"), Some("d"));
        assert_eq!(cache.get("gone1"), None);
    }

    #[tokio::test]
    async fn test_swept_entries_do_not_reappear() {
        let config = CacheConfig::default().with_sweep_interval(Duration::from_millis(20));
        let cache = Cache::with_config(config);

        cache.set_with_ttl("ephemeral", "x", Some(Duration::from_millis(1)));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get_all().is_empty());
        assert!(cache.is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get_all().is_empty());
    }

    #[tokio::test]
    async fn test_permanent_entries_survive_sweeps() {
        let cache = Cache::with_config(
            CacheConfig::default().with_sweep_interval(Duration::from_millis(10)),
        );

        cache.set("forever", "value");
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get("forever"), Some("value"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_close_stops_reclamation() {
        init_logs();
        let config = CacheConfig::default().with_sweep_interval(Duration::from_millis(10));
        let cache = Cache::with_config(config);

        cache.set_with_ttl("stale", "x", Some(Duration::from_millis(1)));
        cache.close();

        tokio::time::sleep(Duration::from_millis(80)).await;

        // Logically expired, but nothing reclaims it anymore
        assert_eq!(cache.get("stale"), None);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let cache: Cache<&str> = Cache::with_config(
            CacheConfig::default().with_sweep_interval(Duration::from_millis(10)),
        );

        cache.close();
        cache.close();
        cache.clone().close();
    }

    #[tokio::test]
    async fn test_independent_caches_sweep_independently() {
        let fast = Cache::with_config(
            CacheConfig::default().with_sweep_interval(Duration::from_millis(10)),
        );
        let slow = Cache::with_config(
            CacheConfig::default().with_sweep_interval(Duration::from_secs(600)),
        );

        fast.set_with_ttl("a", "x", Some(Duration::from_millis(1)));
        slow.set_with_ttl("a", "x", Some(Duration::from_millis(1)));

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(fast.len(), 0);
        assert_eq!(slow.len(), 1);
        assert_eq!(slow.get("a"), None);
    }

    #[tokio::test]
    async fn test_reinsert_races_the_sweep_by_lock_order() {
        // Pin the accepted expiry/reinsertion ordering: once a pass has
        // removed the stale entry, a reinsertion lands cleanly and is not
        // swept again while its TTL holds.
        let config = CacheConfig::default().with_sweep_interval(Duration::from_millis(10));
        let cache = Cache::with_config(config);

        cache.set_with_ttl("contested", "old", Some(Duration::from_millis(1)));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(cache.is_empty());

        cache.set_with_ttl("contested", "new", Some(Duration::from_secs(60)));
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get("contested"), Some("new"));
        assert_eq!(cache.len(), 1);
    }
}
