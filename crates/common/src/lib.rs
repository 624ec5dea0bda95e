//! Percept Common Utilities
//!
//! Shared infrastructure for all Percept crates:
//! - Error types and result aliases
//! - Frame clock and frame-rate measurement for the capture loop
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
