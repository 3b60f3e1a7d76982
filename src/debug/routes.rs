//! Debug Routes
//!
//! Configures the Axum router for the diagnostic surface.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_domain_handler, clear_handler, health_handler, invalidate_handler, preload_handler,
    stats_handler, warm_offers_handler, warm_user_handler, DebugState,
};

/// Creates the diagnostic router.
///
/// # Middleware
/// - CORS: Allows any origin, for browser consoles on the dev host
/// - Tracing: Logs all requests
pub fn create_router(state: DebugState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/debug/invalidate", post(invalidate_handler))
        .route("/debug/stats", get(stats_handler))
        .route("/debug/clear", post(clear_handler))
        .route("/debug/clear/:domain", post(clear_domain_handler))
        .route("/debug/preload", post(preload_handler))
        .route("/debug/warm/user/:id", post(warm_user_handler))
        .route("/debug/warm/offers", post(warm_offers_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::monitor::CacheMonitor;
    use crate::registry::CacheRegistry;
    use crate::source::FixtureSource;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let monitor = Arc::new(CacheMonitor::new());
        let registry = CacheRegistry::new(&CacheConfig::default(), Some(Arc::clone(&monitor)));
        let state = DebugState::new(registry, Arc::new(FixtureSource::default()), monitor);
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/debug/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalidate_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/debug/invalidate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"event":"bulk_offers_updated"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_clear_requires_post() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/debug/clear").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
