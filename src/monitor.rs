//! Cache Monitor Module
//!
//! Hit/miss counters per cache domain and a periodic performance report.
//! Purely observational: nothing here changes what the caches return.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::StoreStats;
use crate::config::Environment;
use crate::registry::{CacheDomain, CacheRegistry};

#[derive(Debug, Default)]
struct DomainCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

// == Cache Monitor ==
/// Process-wide hit/miss accounting.
///
/// Build one per process and share it through `Arc`; counters only reset
/// when a new monitor is created.
#[derive(Debug)]
pub struct CacheMonitor {
    started_at: Instant,
    counters: [DomainCounters; 3],
}

impl Default for CacheMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheMonitor {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            counters: Default::default(),
        }
    }

    pub fn record_hit(&self, domain: CacheDomain) {
        self.counters[domain.index()].hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self, domain: CacheDomain) {
        self.counters[domain.index()].misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self, domain: CacheDomain) -> u64 {
        self.counters[domain.index()].hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self, domain: CacheDomain) -> u64 {
        self.counters[domain.index()].misses.load(Ordering::Relaxed)
    }

    /// Time since the monitor was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    // == Performance Report ==
    /// Aggregates counters and a stats snapshot of every domain in `registry`.
    pub async fn performance_report(&self, registry: &CacheRegistry) -> PerformanceReport {
        let mut domains = Vec::with_capacity(CacheDomain::ALL.len());
        for (domain, stats) in registry.stats().await {
            let hits = self.hits(domain);
            let misses = self.misses(domain);
            domains.push(DomainReport {
                domain,
                hits,
                misses,
                hit_rate: hit_rate(hits, misses),
                stats,
            });
        }

        let total_hits: u64 = domains.iter().map(|d| d.hits).sum();
        let total_misses: u64 = domains.iter().map(|d| d.misses).sum();

        PerformanceReport {
            generated_at: Utc::now(),
            uptime_secs: self.uptime().as_secs(),
            total_hits,
            total_misses,
            hit_rate: hit_rate(total_hits, total_misses),
            domains,
        }
    }

    // == Periodic Reporting ==
    /// Logs a performance report every `interval_minutes`.
    ///
    /// Only runs in `Environment::Development`; elsewhere nothing is spawned
    /// and `None` is returned. A zero interval is treated as one minute.
    pub fn start_periodic_reporting(
        self: &Arc<Self>,
        registry: CacheRegistry,
        interval_minutes: u64,
        environment: Environment,
    ) -> Option<JoinHandle<()>> {
        if !environment.is_diagnostic() {
            debug!("Periodic cache reporting disabled outside development");
            return None;
        }

        let monitor = Arc::clone(self);
        let interval = Duration::from_secs(interval_minutes.max(1) * 60);

        Some(tokio::spawn(async move {
            info!("Starting cache performance reporting every {:?}", interval);
            loop {
                tokio::time::sleep(interval).await;
                monitor.performance_report(&registry).await.log();
            }
        }))
    }
}

fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

// == Reports ==
/// Per-domain slice of a `PerformanceReport`.
#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub domain: CacheDomain,
    pub hits: u64,
    pub misses: u64,
    /// hits / (hits + misses), 0 when the domain saw no lookups
    pub hit_rate: f64,
    pub stats: StoreStats,
}

/// Snapshot of monitor counters and store sizes.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub generated_at: DateTime<Utc>,
    pub uptime_secs: u64,
    pub total_hits: u64,
    pub total_misses: u64,
    pub hit_rate: f64,
    pub domains: Vec<DomainReport>,
}

impl PerformanceReport {
    /// Returns the slice for `domain`.
    pub fn domain(&self, domain: CacheDomain) -> Option<&DomainReport> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    /// Emits the report through `tracing`.
    pub fn log(&self) {
        info!(
            uptime_secs = self.uptime_secs,
            hits = self.total_hits,
            misses = self.total_misses,
            "Cache performance: {:.1}% hit rate",
            self.hit_rate * 100.0
        );
        for d in &self.domains {
            info!(
                domain = %d.domain,
                hits = d.hits,
                misses = d.misses,
                entries = d.stats.entries,
                size_mb = d.stats.size_mb,
                "Cache domain: {:.1}% hit rate",
                d.hit_rate * 100.0
            );
        }
    }
}
