//! Cache Store Module
//!
//! Bounded key-value storage with lazy TTL expiry, size accounting and
//! score-based eviction.

use std::collections::HashMap;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::eviction::eviction_order;
use crate::cache::{CacheEntry, CleanupReport, StoreStats};
use crate::config::StoreConfig;

/// Share of `max_entries` a reclaim pass drives the store below.
const ENTRY_LOW_WATER_PERCENT: usize = 80;
/// Sweep evicts proactively once the store is above this share of `max_size_bytes`.
const SIZE_HIGH_WATER_PERCENT: usize = 90;
/// Share of `max_size_bytes` a proactive sweep reclaims.
const SWEEP_RECLAIM_PERCENT: usize = 10;

// == Cache Store ==
/// Main cache storage with TTL expiry and hybrid LRU/LFU eviction.
///
/// Expired entries are removed lazily: on `get`/`has`, during a sweep, or when
/// an eviction pass reaches them.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Running sum of `size_bytes` over `entries`
    total_size_bytes: usize,
    /// Fixed limits and defaults
    config: StoreConfig,
    /// Next insertion sequence number
    next_seq: u64,
    /// Entries evicted to reclaim space
    evictions: u64,
    /// Entries removed after their TTL elapsed
    expired: u64,
}

impl<T> CacheStore<T>
where
    T: Clone + Serialize,
{
    // == Constructor ==
    /// Creates an empty store with the given limits.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            entries: HashMap::new(),
            total_size_bytes: 0,
            config,
            next_seq: 0,
            evictions: 0,
            expired: 0,
        }
    }

    // == Set ==
    /// Stores `data` under `key`, replacing any previous entry.
    ///
    /// When the new entry would exceed `max_entries` or `max_size_bytes`,
    /// space is reclaimed first. Never fails: an entry larger than the whole
    /// budget empties the store and is stored anyway.
    pub fn set(&mut self, key: impl Into<String>, data: T, ttl: Option<Duration>) {
        let key = key.into();
        let now = Instant::now();

        // Replace semantics: drop the old size before measuring pressure
        if let Some(old) = self.entries.remove(&key) {
            self.total_size_bytes -= old.size_bytes;
        }

        let entry = CacheEntry::new(data, ttl.unwrap_or(self.config.default_ttl), now, self.next_seq);
        self.next_seq += 1;

        let over_count = self.entries.len() >= self.config.max_entries;
        let over_size = self.total_size_bytes + entry.size_bytes > self.config.max_size_bytes;
        if over_count || over_size {
            let required = (self.total_size_bytes + entry.size_bytes)
                .saturating_sub(self.config.max_size_bytes);
            self.make_space_at(required, now);
        }

        self.total_size_bytes += entry.size_bytes;
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Returns `None` for absent or expired keys; expired entries are removed.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = Instant::now();
        if self.remove_if_expired(key, now) {
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.touch(now);
        Some(entry.data.clone())
    }

    // == Has ==
    /// Checks for a live entry without recording an access.
    pub fn has(&mut self, key: &str) -> bool {
        let now = Instant::now();
        if self.remove_if_expired(key, now) {
            return false;
        }
        self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_size_bytes = 0;
    }

    // == Pattern Invalidation ==
    /// Deletes every key matching `pattern`, returning how many were removed.
    pub fn invalidate_pattern(&mut self, pattern: &Regex) -> usize {
        self.remove_where(|key| pattern.is_match(key))
    }

    /// Deletes every key starting with `prefix`.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        self.remove_where(|key| key.starts_with(prefix))
    }

    // == Stats ==
    /// Returns a point-in-time snapshot of the store.
    pub fn stats(&self) -> StoreStats {
        let total_accesses: u64 = self.entries.values().map(|e| e.access_count).sum();
        StoreStats::new(
            self.entries.len(),
            self.total_size_bytes,
            total_accesses,
            self.evictions,
            self.expired,
        )
    }

    // == Make Space ==
    /// Evicts entries in score order until at least `required_bytes` have been
    /// freed and the entry count is below 80% of `max_entries`.
    ///
    /// Returns the number of entries evicted.
    pub fn make_space(&mut self, required_bytes: usize) -> usize {
        self.make_space_at(required_bytes, Instant::now())
    }

    // == Cleanup ==
    /// Removes expired entries, then reclaims 10% of the size budget if the
    /// store is still above 90% of it.
    pub fn cleanup(&mut self) -> CleanupReport {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }
        self.expired += expired_keys.len() as u64;

        let high_water = self.config.max_size_bytes * SIZE_HIGH_WATER_PERCENT / 100;
        let evicted = if self.total_size_bytes > high_water {
            let reclaim = self.config.max_size_bytes * SWEEP_RECLAIM_PERCENT / 100;
            self.make_space_at(reclaim, now)
        } else {
            0
        };

        CleanupReport {
            expired: expired_keys.len(),
            evicted,
        }
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the running size total.
    pub fn total_size_bytes(&self) -> usize {
        self.total_size_bytes
    }

    /// Returns the stored keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns a reference to the raw entry, ignoring expiry.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    fn make_space_at(&mut self, required_bytes: usize, now: Instant) -> usize {
        let entry_limit = self.config.max_entries * ENTRY_LOW_WATER_PERCENT;
        let mut freed = 0;
        let mut evicted = 0;

        for key in eviction_order(&self.entries, now) {
            if freed >= required_bytes && self.entries.len() * 100 < entry_limit {
                break;
            }
            if let Some(entry) = self.remove_entry(&key) {
                freed += entry.size_bytes;
                evicted += 1;
            }
        }

        self.evictions += evicted as u64;
        if evicted > 0 {
            debug!(evicted, freed_bytes = freed, "Evicted cache entries");
        }
        evicted
    }

    fn remove_if_expired(&mut self, key: &str, now: Instant) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now));
        if expired {
            self.remove_entry(key);
            self.expired += 1;
        }
        expired
    }

    fn remove_where(&mut self, mut matches: impl FnMut(&str) -> bool) -> usize {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| matches(key))
            .cloned()
            .collect();

        for key in &doomed {
            self.remove_entry(key);
        }
        doomed.len()
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let entry = self.entries.remove(key)?;
        self.total_size_bytes -= entry.size_bytes;
        Some(entry)
    }
}
