//! Cache Entry Module
//!
//! Defines a single cached value together with its expiry and access metadata.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// `size_bytes` is estimated once at insertion; cached data is treated as
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub data: T,
    /// Insertion or refresh time
    pub timestamp: Instant,
    /// Time-to-live relative to `timestamp`
    pub ttl: Duration,
    /// Number of successful `get` calls
    pub access_count: u64,
    /// Time of the most recent successful `get`
    pub last_accessed: Instant,
    /// Estimated serialized size of `data`
    pub size_bytes: usize,
    /// Insertion sequence, used to keep eviction ties stable
    pub(crate) seq: u64,
}

impl<T: Serialize> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped at `now`, estimating its size.
    pub fn new(data: T, ttl: Duration, now: Instant, seq: u64) -> Self {
        let size_bytes = estimate_size(&data);
        Self {
            data,
            timestamp: now,
            ttl,
            access_count: 0,
            last_accessed: now,
            size_bytes,
            seq,
        }
    }
}

impl<T> CacheEntry<T> {
    // == Is Expired ==
    /// Checks if the entry has outlived its TTL.
    ///
    /// The entry is expired once strictly more than `ttl` has elapsed since
    /// `timestamp`; at exactly `ttl` it is still live.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) > self.ttl
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self, now: Instant) {
        self.access_count += 1;
        self.last_accessed = now;
    }

    /// Time elapsed since insertion.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.timestamp)
    }

    /// Time elapsed since the last successful read (or insertion).
    pub fn idle(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_accessed)
    }
}

// == Size Estimation ==
/// Estimates the in-memory weight of a value by its JSON encoding length.
///
/// Values that cannot be serialized (e.g. maps with non-string keys) fall
/// back to their shallow `size_of_val`.
pub fn estimate_size<T: Serialize + ?Sized>(data: &T) -> usize {
    match serde_json::to_vec(data) {
        Ok(bytes) => bytes.len(),
        Err(_) => std::mem::size_of_val(data),
    }
}
