//! Target URL validation.
//!
//! Targets are stored exactly as submitted (derivation hashes the raw string),
//! so this module only accepts or rejects, it never rewrites.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Hostname shape accepted for targets: dotted labels ending in an alphabetic TLD.
static HOST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$").expect("valid host regex"));

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is required")]
    Empty,

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Invalid host: {0}")]
    InvalidHost(String),
}

/// Validates a target URL before it reaches the creation path.
///
/// # Rules
///
/// 1. Non-empty
/// 2. Starts with `http://` or `https://`
/// 3. Parses as an absolute URL
/// 4. Host matches `^([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$` (no IP literals, no bare hostnames)
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] rule that fails.
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if !input.starts_with("http://") && !input.starts_with("https://") {
        return Err(UrlValidationError::UnsupportedProtocol);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    let host = url.host_str().unwrap_or_default();
    if !HOST_REGEX.is_match(host) {
        return Err(UrlValidationError::InvalidHost(host.to_string()));
    }

    Ok(())
}
