//! filmak-core: shared types, errors, configuration, and filter mapping.
//!
//! This crate is the foundational dependency for the Filmak server and CLI,
//! providing the normalized movie model, a unified error type, application
//! configuration, genre grouping, and the explore-page query mapping.

pub mod config;
pub mod error;
pub mod explore;
pub mod genre;
pub mod movie;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use movie::*;
