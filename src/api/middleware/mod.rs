//! HTTP middleware for request processing and protection.
//!
//! Provides CORS, rate limiting, and observability middleware.

pub mod cors;
pub mod rate_limit;
pub mod tracing;
