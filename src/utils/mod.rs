//! Utility functions for code derivation and input validation.
//!
//! - [`code_generator`] - Content-addressed short code derivation
//! - [`url_validator`] - Target URL validation

pub mod code_generator;
pub mod url_validator;
