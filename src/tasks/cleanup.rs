//! Cleanup Task
//!
//! Background task that periodically sweeps one cache store.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::registry::CacheDomain;

/// Spawns a background task that periodically sweeps `cache`.
///
/// Each run removes expired entries and, when the store is still above 90%
/// of its size budget, evicts down by a further 10%. The sweep holds the
/// write lock only for the duration of one pass.
///
/// The returned handle is aborted by `SharedCache::destroy`.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(CacheStore::<Value>::new(StoreConfig::api())));
/// let handle = spawn_cleanup_task(store.clone(), Duration::from_secs(60), CacheDomain::Api);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<T>(
    cache: Arc<RwLock<CacheStore<T>>>,
    interval: Duration,
    domain: CacheDomain,
) -> JoinHandle<()>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            domain = %domain,
            "Starting cache cleanup task with interval of {:?}",
            interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let report = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup()
            };

            if report.total() > 0 {
                info!(
                    domain = %domain,
                    expired = report.expired,
                    evicted = report.evicted,
                    "Cache cleanup removed entries"
                );
            } else {
                debug!(domain = %domain, "Cache cleanup: nothing to remove");
            }
        }
    })
}
