//! Eviction Module
//!
//! Hybrid LRU/LFU scoring used to pick victims when a store must reclaim space.
//!
//! Each entry gets a score of `age + idle - access_count * ACCESS_WEIGHT`
//! (milliseconds). Higher scores are evicted first: old, idle entries go
//! early, while every recorded read pushes an entry a full minute back in
//! line, so frequency dominates recency.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::cache::CacheEntry;

/// Milliseconds of protection granted per recorded access.
pub const ACCESS_WEIGHT_MS: i128 = 60_000;

// == Score ==
/// Computes the eviction score of an entry at `now`.
pub fn eviction_score<T>(entry: &CacheEntry<T>, now: Instant) -> i128 {
    let age = entry.age(now).as_millis() as i128;
    let idle = entry.idle(now).as_millis() as i128;
    age + idle - entry.access_count as i128 * ACCESS_WEIGHT_MS
}

// == Eviction Order ==
/// Returns keys ordered from first-to-evict to last-to-evict.
///
/// Ties are broken by insertion sequence, oldest first.
pub fn eviction_order<T>(entries: &HashMap<String, CacheEntry<T>>, now: Instant) -> Vec<String> {
    let mut scored: Vec<(i128, u64, &String)> = entries
        .iter()
        .map(|(key, entry)| (eviction_score(entry, now), entry.seq, key))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, key)| key.clone()).collect()
}
