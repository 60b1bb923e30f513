//! Business logic services for the application layer.

pub mod link_service;
pub mod resolution_engine;

#[cfg(test)]
mod test_support;

pub use link_service::LinkService;
pub use resolution_engine::ResolutionEngine;
