//! Integration Tests for the diagnostic endpoints
//!
//! Tests full request/response cycles through the router.
#![cfg(feature = "debug-api")]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use showcase_cache::debug::{create_router, DebugState};
use showcase_cache::source::FixtureSource;
use showcase_cache::{keys, CacheConfig, CacheMonitor, CacheRegistry};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, CacheRegistry) {
    let monitor = Arc::new(CacheMonitor::new());
    let registry = CacheRegistry::new(&CacheConfig::default(), Some(Arc::clone(&monitor)));
    let source = FixtureSource::new(json!({
        "users": { "u1": { "name": "Ada" } },
        "user_groups": { "u1": ["g1"] },
        "offers": [{ "id": "p1", "status": "open" }],
        "system_attributes": { "currency": "EUR" }
    }));
    let state = DebugState::new(registry.clone(), Arc::new(source), monitor);
    (create_router(state), registry)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method("POST").uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

// == Invalidate Endpoint ==

#[tokio::test]
async fn test_invalidate_project_event() {
    let (app, registry) = create_test_app();
    registry.api().set(keys::project("42"), json!({}), None).await;
    registry.api().set(keys::offers(&json!({})), json!([]), None).await;

    let response = app
        .oneshot(post(
            "/debug/invalidate",
            Some(r#"{"event":"project_updated","id":"42"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["applied"], true);
    assert_eq!(json["keys_removed"], 2);
    assert!(registry.api().is_empty().await);
}

#[tokio::test]
async fn test_invalidate_unknown_event_is_not_an_error() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(post("/debug/invalidate", Some(r#"{"event":"mystery"}"#)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["applied"], false);
}

#[tokio::test]
async fn test_invalidate_empty_event_rejected() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(post("/debug/invalidate", Some(r#"{"event":""}"#)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Event cannot be empty"));
}

// == Warming Endpoints ==

#[tokio::test]
async fn test_preload_then_stats() {
    let (app, registry) = create_test_app();

    let response = app.clone().oneshot(post("/debug/preload", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(registry.static_data().has(keys::SYSTEM_ATTRIBUTES).await);

    let response = app
        .oneshot(Request::builder().uri("/debug/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    // Preload misses once per key it fills
    assert_eq!(json["total_misses"], 2);
    assert_eq!(json["domains"].as_array().unwrap().len(), 3);
    assert_eq!(json["domains"][2]["domain"], "static");
    assert_eq!(json["domains"][2]["stats"]["entries"], 1);
}

#[tokio::test]
async fn test_warm_user() {
    let (app, registry) = create_test_app();

    let response = app.oneshot(post("/debug/warm/user/u1", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(registry.user().get("user:u1:groups").await, Some(json!(["g1"])));
}

#[tokio::test]
async fn test_warm_unknown_user_is_bad_gateway() {
    let (app, registry) = create_test_app();

    let response = app.oneshot(post("/debug/warm/user/ghost", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(registry.user().is_empty().await);
}

#[tokio::test]
async fn test_warm_offers_then_clear() {
    let (app, registry) = create_test_app();

    let response = app.clone().oneshot(post("/debug/warm/offers", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(registry.api().len().await, 1);

    let response = app.oneshot(post("/debug/clear", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(registry.api().is_empty().await);
}

#[tokio::test]
async fn test_clear_single_domain() {
    let (app, registry) = create_test_app();
    registry.static_data().set(keys::group("g1"), json!({}), None).await;
    registry.user().set(keys::user("u1"), json!({}), None).await;

    let response = app.clone().oneshot(post("/debug/clear/static", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(registry.static_data().is_empty().await);
    assert_eq!(registry.user().len().await, 1);

    let response = app.oneshot(post("/debug/clear/session", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("unknown cache domain"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
