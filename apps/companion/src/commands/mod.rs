//! # Command Handlers
//!
//! Everything the companion CLI can do, grouped by concern.
//!
//! ## Available Commands
//!
//! - [`render`] - Receipt and test-page rendering for each printer family
//! - [`cache`] - Response cache inspection and eviction

pub mod cache;
pub mod render;
