//! Shared test fixtures for the projpicker-web workspace.
//!
//! This crate provides common testing data:
//! - CRS records and the search responses that carry them
//! - Drawn GeoJSON features as JSON values
//!
//! Features are returned as `serde_json::Value` so this crate does not depend
//! on the protocol crate whose tests use it.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod features;
pub mod fixtures;

// Re-export commonly used items at the crate root
pub use features::*;
pub use fixtures::*;
