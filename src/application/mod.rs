//! Application layer services implementing business logic.
//!
//! Services consume the tier traits from [`crate::domain::repositories`] and
//! [`crate::infrastructure::cache`] and provide a clean API for HTTP handlers
//! and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::resolution_engine::ResolutionEngine`] - Concurrent two-tier lookup with cache repair
//! - [`services::link_service::LinkService`] - Idempotent creation and dual-tier writes

pub mod services;
