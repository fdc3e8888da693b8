//! Quill Shared Library
//!
//! This crate contains the API types, error taxonomy and validation
//! rules shared between the backend and its clients.

pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
