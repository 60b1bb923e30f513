#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use chrono::Utc;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

use tiered_shortener::application::services::LinkService;
use tiered_shortener::config::CollisionPolicy;
use tiered_shortener::domain::entities::{Mapping, NewMapping};
use tiered_shortener::domain::repositories::{MappingStore, StoreError};
use tiered_shortener::domain::visit_event::VisitEvent;
use tiered_shortener::infrastructure::cache::{CacheError, CacheResult, CacheService};
use tiered_shortener::state::AppState;

pub const TEST_BASE_URL: &str = "http://s.example.com/";
pub const TEST_TIMEOUT: Duration = Duration::from_secs(2);

/// In-memory cache tier with switchable failures.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn put(&self, code: &str, target: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), target.to_string());
    }

    pub fn get(&self, code: &str) -> Option<String> {
        self.entries.lock().unwrap().get(code).cloned()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        if self.fail_reads {
            return Err(CacheError::ConnectionError("connection refused".to_string()));
        }
        Ok(self.get(short_code))
    }

    async fn set_url(&self, short_code: &str, target_url: &str) -> CacheResult<()> {
        if self.fail_writes {
            return Err(CacheError::ConnectionError("connection refused".to_string()));
        }
        self.put(short_code, target_url);
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(short_code);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.fail_reads
    }
}

/// In-memory durable tier with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, Mapping>>,
    inserts: Mutex<Vec<NewMapping>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn put(&self, code: &str, target: &str) {
        self.rows.lock().unwrap().insert(
            code.to_string(),
            Mapping::new(code.to_string(), target.to_string(), None, Utc::now()),
        );
    }

    pub fn row(&self, code: &str) -> Option<Mapping> {
        self.rows.lock().unwrap().get(code).cloned()
    }

    pub fn inserts(&self) -> Vec<NewMapping> {
        self.inserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn get(&self, short_code: &str) -> Result<Option<Mapping>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.row(short_code))
    }

    async fn insert(&self, new_mapping: &NewMapping) -> Result<(), StoreError> {
        self.inserts.lock().unwrap().push(new_mapping.clone());
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&new_mapping.short_code) {
            return Err(StoreError::Duplicate(new_mapping.short_code.clone()));
        }
        rows.insert(
            new_mapping.short_code.clone(),
            Mapping::new(
                new_mapping.short_code.clone(),
                new_mapping.target_url.clone(),
                new_mapping.expires_at,
                Utc::now(),
            ),
        );
        Ok(())
    }

    async fn delete(&self, short_code: &str) -> Result<bool, StoreError> {
        Ok(self.rows.lock().unwrap().remove(short_code).is_some())
    }

    async fn health_check(&self) -> bool {
        !self.fail_reads
    }
}

pub fn create_test_state(
    cache: Arc<MemoryCache>,
    store: Arc<MemoryStore>,
) -> (AppState, mpsc::Receiver<VisitEvent>) {
    create_test_state_with_policy(cache, store, CollisionPolicy::Reject)
}

pub fn create_test_state_with_policy(
    cache: Arc<MemoryCache>,
    store: Arc<MemoryStore>,
    policy: CollisionPolicy,
) -> (AppState, mpsc::Receiver<VisitEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let cache: Arc<dyn CacheService> = cache;
    let store: Arc<dyn MappingStore> = store;

    let link_service = Arc::new(LinkService::new(
        cache.clone(),
        store.clone(),
        TEST_TIMEOUT,
        policy,
    ));

    let state = AppState::new(link_service, cache, store, tx, TEST_BASE_URL.to_string());

    (state, rx)
}

/// Inserts a fixed peer address so handlers and the rate limiter can read
/// `ConnectInfo` without a real socket.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
