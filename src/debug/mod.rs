//! Debug Module
//!
//! Operator HTTP surface for inspecting and poking the caches. Compiled only
//! with the `debug-api` feature and mounted only outside production.
//!
//! # Endpoints
//! - `POST /debug/invalidate` - Apply a named invalidation event
//! - `GET /debug/stats` - Performance report across all domains
//! - `POST /debug/clear` - Empty every domain
//! - `POST /debug/clear/:domain` - Empty one domain (`api`, `user` or `static`)
//! - `POST /debug/preload` - Load reference data
//! - `POST /debug/warm/user/:id` - Load a user's profile and groups
//! - `POST /debug/warm/offers` - Load the unfiltered offer listing
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
