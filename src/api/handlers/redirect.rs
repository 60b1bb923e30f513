//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::Redirect,
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::debug;

use crate::domain::resolution::LookupOutcome;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_code;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject codes that are not 7 alphanumeric characters
/// 2. Resolve through the cache and durable tiers concurrently
/// 3. Queue a visit event for the background worker
/// 4. Return 303 See Other
///
/// Visits are dropped when the queue is full; recording never delays the
/// redirect.
///
/// # Errors
///
/// - 400 if the code is malformed
/// - 404 if no tier knows the code
/// - 500 if a tier is unavailable or the lookup times out
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Redirect, AppError> {
    if !is_valid_code(&code) {
        return Err(AppError::bad_request(
            "Invalid short code",
            json!({ "code": code }),
        ));
    }

    let target_url = match state.link_service.resolve(&code).await? {
        LookupOutcome::Found(target_url) => target_url,
        LookupOutcome::NotFound => {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }
    };

    let visit = VisitEvent::new(
        code,
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    if let Err(e) = state.visit_sender.try_send(visit) {
        metrics::counter!("visits_dropped_total").increment(1);
        debug!("Visit not queued: {}", e);
    }

    Ok(Redirect::to(&target_url))
}
