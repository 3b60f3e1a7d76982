//! Background Tasks Module
//!
//! Contains background tasks that run periodically while caches are alive.
//!
//! # Tasks
//! - Cleanup: Removes expired entries and relieves size pressure per store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
