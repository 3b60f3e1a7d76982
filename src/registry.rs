//! Cache Registry Module
//!
//! Composition root for the named cache domains. One registry is built per
//! process and handed to every component that reads or invalidates caches.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::cache::{SharedCache, StoreStats};
use crate::config::CacheConfig;
use crate::monitor::CacheMonitor;

/// Cache holding opaque JSON documents.
pub type JsonCache = SharedCache<Value>;

// == Cache Domain ==
/// One of the independently budgeted cache stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheDomain {
    /// Project pages and offer listings
    Api,
    /// User profiles and group memberships
    User,
    /// Groups and system attributes
    Static,
}

impl CacheDomain {
    pub const ALL: [CacheDomain; 3] = [CacheDomain::Api, CacheDomain::User, CacheDomain::Static];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheDomain::Api => "api",
            CacheDomain::User => "user",
            CacheDomain::Static => "static",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CacheDomain::Api => 0,
            CacheDomain::User => 1,
            CacheDomain::Static => 2,
        }
    }
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheDomain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| format!("unknown cache domain: {s}"))
    }
}

// == Cache Registry ==
/// The three shared cache domains plus the monitor they report to.
#[derive(Clone)]
pub struct CacheRegistry {
    api: JsonCache,
    user: JsonCache,
    static_data: JsonCache,
    monitor: Option<Arc<CacheMonitor>>,
}

impl CacheRegistry {
    // == Constructor ==
    /// Builds every domain from `config`, attaching `monitor` when given.
    pub fn new(config: &CacheConfig, monitor: Option<Arc<CacheMonitor>>) -> Self {
        Self {
            api: SharedCache::new(CacheDomain::Api, config.api.clone(), monitor.clone()),
            user: SharedCache::new(CacheDomain::User, config.user.clone(), monitor.clone()),
            static_data: SharedCache::new(
                CacheDomain::Static,
                config.static_data.clone(),
                monitor.clone(),
            ),
            monitor,
        }
    }

    pub fn api(&self) -> &JsonCache {
        &self.api
    }

    pub fn user(&self) -> &JsonCache {
        &self.user
    }

    pub fn static_data(&self) -> &JsonCache {
        &self.static_data
    }

    /// Returns the cache for `domain`.
    pub fn store(&self, domain: CacheDomain) -> &JsonCache {
        match domain {
            CacheDomain::Api => &self.api,
            CacheDomain::User => &self.user,
            CacheDomain::Static => &self.static_data,
        }
    }

    pub fn monitor(&self) -> Option<&Arc<CacheMonitor>> {
        self.monitor.as_ref()
    }

    /// Empties every domain. Sweeps keep running.
    pub async fn clear_all(&self) {
        for domain in CacheDomain::ALL {
            self.store(domain).clear().await;
        }
        info!("All caches cleared");
    }

    /// Stops every sweep and empties every domain.
    pub async fn destroy(&self) {
        for domain in CacheDomain::ALL {
            self.store(domain).destroy().await;
        }
        info!("All caches destroyed");
    }

    /// Snapshot of each domain, in `CacheDomain::ALL` order.
    pub async fn stats(&self) -> Vec<(CacheDomain, StoreStats)> {
        let mut stats = Vec::with_capacity(CacheDomain::ALL.len());
        for domain in CacheDomain::ALL {
            stats.push((domain, self.store(domain).stats().await));
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_round_trips_through_str() {
        for domain in CacheDomain::ALL {
            assert_eq!(domain.as_str().parse::<CacheDomain>(), Ok(domain));
        }
        assert!("session".parse::<CacheDomain>().is_err());
    }

    #[test]
    fn test_domain_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CacheDomain::Static).unwrap(), r#""static""#);
    }

    #[tokio::test(start_paused = true)]
    async fn test_domains_are_independent() {
        let registry = CacheRegistry::new(&CacheConfig::default(), None);
        registry.api().set("project:1", json!({}), None).await;

        assert!(registry.store(CacheDomain::Api).has("project:1").await);
        assert!(!registry.user().has("project:1").await);
        assert_eq!(registry.user().domain(), CacheDomain::User);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_and_destroy() {
        let registry = CacheRegistry::new(&CacheConfig::default(), None);
        registry.api().set("a", json!(1), None).await;
        registry.user().set("b", json!(2), None).await;
        registry.static_data().set("c", json!(3), None).await;

        registry.clear_all().await;
        for (_, stats) in registry.stats().await {
            assert_eq!(stats.entries, 0);
        }
        assert!(registry.api().is_scheduled());

        registry.destroy().await;
        assert!(!registry.static_data().is_scheduled());
    }
}
