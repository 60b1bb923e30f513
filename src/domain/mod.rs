//! Domain layer containing entities, contracts and the outcome taxonomy.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Durable tier trait definitions
//! - [`resolution`] - Lookup outcomes and resolution/creation failures
//! - [`visit_event`] - Visit recording event model
//! - [`visit_worker`] - Asynchronous visit processing worker
//!
//! # Visit Processing Flow
//!
//! 1. Redirect handler resolves a short code
//! 2. [`visit_event::VisitEvent`] is sent to a bounded channel
//! 3. [`visit_worker::run_visit_worker`] persists events with retry logic
//! 4. Visit data is stored via [`repositories::VisitRepository`]

pub mod entities;
pub mod repositories;
pub mod resolution;
pub mod visit_event;
pub mod visit_worker;
