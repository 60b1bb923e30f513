//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "durable": { "status": "ok", "message": "PostgreSQL connected" },
///     "cache": { "status": "ok", "message": "Cache reachable" },
///     "visit_queue": { "status": "ok", "message": "Capacity: 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (durable, cache) = tokio::join!(state.store.health_check(), state.cache.health_check());

    let checks = HealthChecks {
        durable: if durable {
            CheckStatus::ok("PostgreSQL connected")
        } else {
            CheckStatus::error("PostgreSQL query failed")
        },
        cache: if cache {
            CheckStatus::ok("Cache reachable")
        } else {
            CheckStatus::error("Cache connection failed")
        },
        visit_queue: check_visit_queue(&state),
    };

    let all_healthy = checks.durable.is_ok() && checks.cache.is_ok() && checks.visit_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn check_visit_queue(state: &AppState) -> CheckStatus {
    if state.visit_sender.is_closed() {
        CheckStatus::error("Visit queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.visit_sender.capacity()))
    }
}
