//! Outcome and failure taxonomy for resolution and creation.
//!
//! `NotFound` is a normal outcome, never an error: callers deciding whether to
//! create a mapping must be able to tell "definitely absent" from "unknown".

use std::fmt;
use std::time::Duration;

/// One of the two storage layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Volatile cache (Redis).
    Cache,
    /// Authoritative store (PostgreSQL).
    Durable,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Durable => "durable",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definitive answer of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(String),
    NotFound,
}

/// Resolution ended without a definitive answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{tier} tier unavailable: {reason}")]
    TierUnavailable { tier: Tier, reason: String },

    #[error("lookup timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Creation failed; the mapping must not be reported as created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    /// The existence check could not give a definitive answer.
    #[error("could not check for an existing mapping: {0}")]
    Lookup(#[from] ResolveError),

    /// The derived code is already bound to a different target.
    #[error("short code {code} is already taken by a different URL")]
    Collision { code: String },

    /// At least one tier write failed. The other tier may hold the mapping.
    #[error("{tier} tier write failed: {reason}")]
    PartialWrite { tier: Tier, reason: String },
}

/// Result of a successful creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub code: String,
    /// True when the mapping already existed and no write was performed.
    pub existing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::Cache.to_string(), "cache");
        assert_eq!(Tier::Durable.to_string(), "durable");
    }

    #[test]
    fn test_resolve_error_messages() {
        let err = ResolveError::TierUnavailable {
            tier: Tier::Durable,
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "durable tier unavailable: connection refused");

        let err = ResolveError::Timeout(Duration::from_millis(5000));
        assert_eq!(err.to_string(), "lookup timed out after 5000ms");
    }

    #[test]
    fn test_create_error_from_resolve_error() {
        let err: CreateError = ResolveError::Timeout(Duration::from_secs(1)).into();
        assert!(matches!(err, CreateError::Lookup(ResolveError::Timeout(_))));
    }
}
