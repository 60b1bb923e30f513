//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`         - Static creation form (`STATIC_DIR/index.html`)
//! - `POST /create`   - Create a short URL
//! - `GET  /health`   - Health check
//! - `GET  /{code}`   - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call `/create` and follow redirects
//! - **Rate limiting** - Per-IP token bucket on `/create`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use std::path::Path;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeFile;

/// Constructs the application router with all routes and middleware.
///
/// `static_dir` is the directory holding `index.html`.
pub fn app_router(state: AppState, static_dir: &str) -> NormalizePath<Router> {
    let index = ServeFile::new(Path::new(static_dir).join("index.html"));

    let router = Router::new()
        .route_service("/", index)
        .merge(api::routes::public_routes())
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
