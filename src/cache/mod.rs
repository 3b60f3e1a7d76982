//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, size accounting and
//! hybrid LRU/LFU eviction.

mod entry;
pub mod eviction;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{estimate_size, CacheEntry};
pub use shared::SharedCache;
pub use stats::{CleanupReport, StoreStats};
pub use store::CacheStore;
