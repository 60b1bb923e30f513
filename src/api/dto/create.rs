//! DTOs for the link creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

/// Request to shorten a single URL.
///
/// The URL is checked twice: `validator` bounds its length, and
/// [`crate::utils::url_validator::validate_target_url`] checks scheme and host.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Optional RFC 3339 expiry. Empty strings are treated as absent.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response carrying the full short URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub short_url: String,
}
