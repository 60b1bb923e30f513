mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use common::{MemoryCache, MemoryStore, MockConnectInfoLayer};
use std::sync::Arc;
use std::time::Duration;
use tiered_shortener::api::handlers::redirect_handler;
use tiered_shortener::state::AppState;

const CODE: &str = "aB3dE9z";
const TARGET: &str = "https://example.com/target";

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .layer(MockConnectInfoLayer)
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_from_cache() {
    let cache = Arc::new(MemoryCache::new());
    cache.put(CODE, TARGET);
    let (state, _rx) = common::create_test_state(cache, Arc::new(MemoryStore::new()));

    let response = server(state).get(&format!("/{CODE}")).await;

    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), TARGET);
}

#[tokio::test]
async fn test_redirect_from_durable_repairs_cache() {
    let cache = Arc::new(MemoryCache::new());
    let store = Arc::new(MemoryStore::new());
    store.put(CODE, TARGET);
    let (state, _rx) = common::create_test_state(cache.clone(), store);

    let response = server(state).get(&format!("/{CODE}")).await;

    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), TARGET);

    // The repair write is detached from the request.
    for _ in 0..50 {
        if cache.get(CODE).is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(cache.get(CODE).as_deref(), Some(TARGET));
}

#[tokio::test]
async fn test_redirect_when_cache_is_down() {
    let store = Arc::new(MemoryStore::new());
    store.put(CODE, TARGET);
    let (state, _rx) = common::create_test_state(Arc::new(MemoryCache::failing()), store);

    let response = server(state).get(&format!("/{CODE}")).await;

    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), TARGET);
}

#[tokio::test]
async fn test_redirect_queues_visit() {
    let cache = Arc::new(MemoryCache::new());
    cache.put(CODE, TARGET);
    let (state, mut rx) = common::create_test_state(cache, Arc::new(MemoryStore::new()));

    server(state)
        .get(&format!("/{CODE}"))
        .add_header("User-Agent", "integration-test")
        .add_header("Referer", "https://referrer.example.com/")
        .await;

    let visit = rx.try_recv().unwrap();
    assert_eq!(visit.short_code, CODE);
    assert_eq!(visit.ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(visit.user_agent.as_deref(), Some("integration-test"));
    assert_eq!(visit.referer.as_deref(), Some("https://referrer.example.com/"));
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, mut rx) =
        common::create_test_state(Arc::new(MemoryCache::new()), Arc::new(MemoryStore::new()));

    let response = server(state).get("/zzzzzzz").await;

    assert_eq!(response.status_code(), 404);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_invalid_code() {
    let (state, _rx) =
        common::create_test_state(Arc::new(MemoryCache::new()), Arc::new(MemoryStore::new()));
    let server = server(state);

    for code in ["short", "toolongcode", "ab-cd_e"] {
        let response = server.get(&format!("/{code}")).await;
        assert_eq!(response.status_code(), 400, "code {code}");
    }
}

#[tokio::test]
async fn test_redirect_durable_failure_is_internal_error() {
    let (state, _rx) =
        common::create_test_state(Arc::new(MemoryCache::new()), Arc::new(MemoryStore::failing()));

    let response = server(state).get(&format!("/{CODE}")).await;

    assert_eq!(response.status_code(), 500);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "internal_error");
    assert_eq!(json["error"]["details"]["tier"], "durable");
    assert!(json["error"]["details"].get("reason").is_none());
    assert!(!response.text().contains("pool timed out"));
}
