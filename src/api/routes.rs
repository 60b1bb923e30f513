//! API route configuration.

use crate::api::handlers::{create_handler, health_handler, redirect_handler};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public API routes.
///
/// # Endpoints
///
/// - `POST /create`  - Create (or look up) a short URL, rate limited per IP
/// - `GET  /health`  - Tier and visit queue health
/// - `GET  /{code}`  - Redirect to the target URL
pub fn public_routes() -> Router<AppState> {
    let create = Router::new()
        .route("/create", post(create_handler))
        .layer(rate_limit::layer());

    Router::new()
        .merge(create)
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
