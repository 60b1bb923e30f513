//! Core domain entities.
//!
//! - [`Mapping`] - A short code → target URL mapping
//! - [`NewMapping`] - Input for the dual-tier write on creation
//! - [`NewVisit`] / [`VisitTally`] - Visit audit records

pub mod mapping;
pub mod visit;

pub use mapping::{Mapping, NewMapping};
pub use visit::{NewVisit, VisitTally};
