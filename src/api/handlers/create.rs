//! Handler for short link creation.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::json;
use validator::Validate;

use crate::api::dto::create::{CreateRequest, CreateResponse};
use crate::application::services::link_service::short_url;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::validate_target_url;

/// Creates (or returns the existing) short URL for a target.
///
/// # Endpoint
///
/// `POST /create`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a", "expires_at": "2030-01-01T00:00:00Z" }
/// ```
///
/// # Response
///
/// ```json
/// { "short_url": "http://localhost:3000/aB3dE9z" }
/// ```
///
/// Repeating a request returns the same short URL with `200 OK`.
///
/// # Errors
///
/// - 400 for malformed JSON or an invalid URL
/// - 409 if the derived code is bound to a different URL
/// - 500 if a tier is unavailable, the lookup times out, or a tier write fails
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Json<CreateResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::bad_request("Invalid JSON input", json!({ "reason": e.body_text() }))
    })?;

    payload.validate()?;
    validate_target_url(&payload.url)?;

    let created = state
        .link_service
        .create(&payload.url, payload.expires_at)
        .await?;

    Ok(Json(CreateResponse {
        short_url: short_url(&state.base_url, &created.code),
    }))
}
