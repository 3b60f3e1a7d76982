//! Shared Cache Module
//!
//! Async, cloneable handle around a `CacheStore` that owns its background
//! sweep and reports lookups to an optional `CacheMonitor`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheStore, StoreStats};
use crate::config::StoreConfig;
use crate::monitor::CacheMonitor;
use crate::registry::CacheDomain;
use crate::tasks::spawn_cleanup_task;

// == Shared Cache ==
/// Handle to one named cache domain.
///
/// Clones share the same store. The periodic sweep starts on construction
/// and stops on `destroy` or when the last handle is dropped.
///
/// `get_or_set` does not coalesce concurrent misses: two callers racing on a
/// cold key each run their own factory and the last write wins.
pub struct SharedCache<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    store: Arc<RwLock<CacheStore<T>>>,
    domain: CacheDomain,
    monitor: Option<Arc<CacheMonitor>>,
    cleanup: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Clone for SharedCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.cleanup.get_mut().take() {
            handle.abort();
        }
    }
}

impl<T> SharedCache<T>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates the store for `domain` and schedules its sweep.
    ///
    /// Outside a tokio runtime no sweep is scheduled; expiry then happens
    /// only lazily on access.
    pub fn new(domain: CacheDomain, config: StoreConfig, monitor: Option<Arc<CacheMonitor>>) -> Self {
        let interval = config.cleanup_interval;
        let store = Arc::new(RwLock::new(CacheStore::new(config)));

        let cleanup = match tokio::runtime::Handle::try_current() {
            Ok(_) => Some(spawn_cleanup_task(Arc::clone(&store), interval, domain)),
            Err(_) => {
                warn!(domain = %domain, "No tokio runtime; periodic cleanup disabled");
                None
            }
        };

        Self {
            inner: Arc::new(Inner {
                store,
                domain,
                monitor,
                cleanup: Mutex::new(cleanup),
            }),
        }
    }

    /// Returns the domain this cache serves.
    pub fn domain(&self) -> CacheDomain {
        self.inner.domain
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for `key`.
    pub async fn set(&self, key: impl Into<String>, data: T, ttl: Option<Duration>) {
        self.inner.store.write().await.set(key, data, ttl);
    }

    // == Get ==
    /// Looks up a live value, recording a hit or miss with the monitor.
    pub async fn get(&self, key: &str) -> Option<T> {
        let value = self.inner.store.write().await.get(key);
        if let Some(monitor) = &self.inner.monitor {
            match value {
                Some(_) => monitor.record_hit(self.inner.domain),
                None => monitor.record_miss(self.inner.domain),
            }
        }
        value
    }

    /// Checks for a live entry without touching access statistics.
    pub async fn has(&self, key: &str) -> bool {
        self.inner.store.write().await.has(key)
    }

    /// Removes an entry, returning whether one existed.
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.store.write().await.delete(key)
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        self.inner.store.write().await.clear();
    }

    // == Get Or Set ==
    /// Returns the cached value for `key`, or runs `factory` and caches its
    /// result.
    ///
    /// The factory runs at most once per call and no lock is held while it
    /// runs. If it fails the error is returned unchanged and nothing is stored.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: &str,
        factory: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let value = factory().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }

    /// Deletes every key matching `pattern`.
    pub async fn invalidate_pattern(&self, pattern: &Regex) -> usize {
        self.inner.store.write().await.invalidate_pattern(pattern)
    }

    /// Deletes every key starting with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.inner.store.write().await.invalidate_prefix(prefix)
    }

    /// Returns a point-in-time snapshot of the store.
    pub async fn stats(&self) -> StoreStats {
        self.inner.store.read().await.stats()
    }

    /// Returns the number of stored entries.
    pub async fn len(&self) -> usize {
        self.inner.store.read().await.len()
    }

    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.store.read().await.is_empty()
    }

    /// Returns true while the background sweep is scheduled.
    pub fn is_scheduled(&self) -> bool {
        self.inner
            .cleanup
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // == Destroy ==
    /// Stops the background sweep and empties the store.
    ///
    /// Safe to call repeatedly. The cache stays usable afterwards, but no
    /// sweep runs again for this domain.
    pub async fn destroy(&self) {
        let handle = self.inner.cleanup.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            debug!(domain = %self.inner.domain, "Cleanup task aborted");
        }
        self.clear().await;
    }
}
