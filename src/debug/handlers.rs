//! Debug Handlers
//!
//! HTTP request handlers for each diagnostic endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{CacheError, Result};
use crate::invalidation::InvalidationManager;
use crate::models::{HealthResponse, InvalidateRequest, InvalidateResponse, MessageResponse};
use crate::monitor::{CacheMonitor, PerformanceReport};
use crate::registry::{CacheDomain, CacheRegistry};
use crate::source::DataSource;
use crate::warmer::CacheWarmer;

/// State shared across all diagnostic handlers.
#[derive(Clone)]
pub struct DebugState {
    pub invalidation: InvalidationManager,
    pub warmer: CacheWarmer,
    pub monitor: Arc<CacheMonitor>,
}

impl DebugState {
    pub fn new(
        registry: CacheRegistry,
        source: Arc<dyn DataSource>,
        monitor: Arc<CacheMonitor>,
    ) -> Self {
        Self {
            invalidation: InvalidationManager::new(registry.clone()),
            warmer: CacheWarmer::new(registry, source),
            monitor,
        }
    }

    pub fn registry(&self) -> &CacheRegistry {
        self.invalidation.registry()
    }
}

/// Handler for POST /debug/invalidate
///
/// Unknown events are not an error; the response reports `applied: false`.
pub async fn invalidate_handler(
    State(state): State<DebugState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let outcome = state
        .invalidation
        .smart_invalidate(&req.event, req.id.as_deref(), req.context.as_ref())
        .await;

    Ok(Json(InvalidateResponse::new(req.event, outcome)))
}

/// Handler for GET /debug/stats
pub async fn stats_handler(State(state): State<DebugState>) -> Json<PerformanceReport> {
    Json(state.monitor.performance_report(state.registry()).await)
}

/// Handler for POST /debug/clear
pub async fn clear_handler(State(state): State<DebugState>) -> Json<MessageResponse> {
    state.invalidation.clear_all_caches().await;
    Json(MessageResponse::new("All caches cleared"))
}

/// Handler for POST /debug/clear/:domain
pub async fn clear_domain_handler(
    State(state): State<DebugState>,
    Path(domain): Path<String>,
) -> Result<Json<MessageResponse>> {
    let domain: CacheDomain = domain.parse().map_err(CacheError::InvalidRequest)?;
    state.registry().store(domain).clear().await;
    Ok(Json(MessageResponse::new(format!("Cache '{}' cleared", domain))))
}

/// Handler for POST /debug/preload
pub async fn preload_handler(State(state): State<DebugState>) -> Result<Json<MessageResponse>> {
    state.warmer.preload().await?;
    Ok(Json(MessageResponse::new("Preload complete")))
}

/// Handler for POST /debug/warm/user/:id
pub async fn warm_user_handler(
    State(state): State<DebugState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.warmer.warm_user(&user_id).await?;
    Ok(Json(MessageResponse::new(format!("User '{}' warmed", user_id))))
}

/// Handler for POST /debug/warm/offers
pub async fn warm_offers_handler(
    State(state): State<DebugState>,
) -> Result<Json<MessageResponse>> {
    state.warmer.warm_offers().await?;
    Ok(Json(MessageResponse::new("Offers warmed")))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
