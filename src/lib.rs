//! Showcase Cache - In-memory read-through caching for the showcase backend
//!
//! Named cache domains with TTL expiry and hybrid LRU/LFU eviction, semantic
//! invalidation, hit/miss monitoring and cache warming.

pub mod cache;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod keys;
pub mod monitor;
pub mod registry;
pub mod source;
pub mod tasks;
pub mod warmer;

#[cfg(feature = "debug-api")]
pub mod debug;
#[cfg(feature = "debug-api")]
pub mod models;

pub use cache::{CacheStore, SharedCache, StoreStats};
pub use config::{CacheConfig, Config, Environment, StoreConfig};
pub use invalidation::{InvalidationContext, InvalidationManager};
pub use monitor::CacheMonitor;
pub use registry::{CacheDomain, CacheRegistry};
pub use warmer::CacheWarmer;
