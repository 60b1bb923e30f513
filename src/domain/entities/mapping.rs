//! Mapping entity relating a short code to its target URL.

use chrono::{DateTime, Utc};

/// A stored short code → target URL mapping.
///
/// Mappings are created once and never mutated. The short code is derived
/// from `target_url`, so the pair is stable for the mapping's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub short_code: String,
    pub target_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(
        short_code: String,
        target_url: String,
        expires_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            short_code,
            target_url,
            expires_at,
            created_at,
        }
    }
}

/// Input data for writing a new mapping to both tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub short_code: String,
    pub target_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}
