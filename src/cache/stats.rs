//! Cache Statistics Module
//!
//! Point-in-time snapshots of a store's size and activity.

use serde::Serialize;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// == Store Stats ==
/// Snapshot returned by `CacheStore::stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    /// Current number of entries in the store
    pub entries: usize,
    /// Running sum of estimated entry sizes
    pub size_bytes: usize,
    /// `size_bytes` expressed in megabytes, rounded to two decimals
    pub size_mb: f64,
    /// Accumulated reads across live entries divided by entry count.
    ///
    /// This is an informal activity figure, not a true hit ratio; use
    /// `CacheMonitor` for hits versus misses.
    pub hit_rate: f64,
    /// Entries removed to reclaim space since construction
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expired: u64,
}

impl StoreStats {
    // == Constructor ==
    /// Builds a snapshot from raw store counters.
    pub fn new(
        entries: usize,
        size_bytes: usize,
        total_accesses: u64,
        evictions: u64,
        expired: u64,
    ) -> Self {
        Self {
            entries,
            size_bytes,
            size_mb: round2(size_bytes as f64 / BYTES_PER_MB),
            hit_rate: access_rate(total_accesses, entries),
            evictions,
            expired,
        }
    }
}

// == Cleanup Report ==
/// Result of one periodic sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Expired entries removed
    pub expired: usize,
    /// Live entries evicted because the store stayed above its high-water mark
    pub evicted: usize,
}

impl CleanupReport {
    /// Total number of entries removed by the sweep.
    pub fn total(&self) -> usize {
        self.expired + self.evicted
    }
}

fn access_rate(total_accesses: u64, entries: usize) -> f64 {
    if entries == 0 {
        0.0
    } else {
        total_accesses as f64 / entries as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = StoreStats::default();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.size_bytes, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_empty_store() {
        let stats = StoreStats::new(0, 0, 12, 0, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_is_accesses_per_entry() {
        let stats = StoreStats::new(4, 100, 10, 0, 0);
        assert_eq!(stats.hit_rate, 2.5);
    }

    #[test]
    fn test_size_mb_rounding() {
        let stats = StoreStats::new(1, 3 * 1024 * 1024 / 2, 0, 0, 0);
        assert_eq!(stats.size_mb, 1.5);
    }

    #[test]
    fn test_cleanup_report_total() {
        let report = CleanupReport {
            expired: 3,
            evicted: 2,
        };
        assert_eq!(report.total(), 5);
    }
}
