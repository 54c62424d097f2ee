//! Configuration module for post-processing
//!
//! This module provides `ProcessingOptions`, the per-invocation switches that
//! gate pipeline stages, and `FontResolverConfig` for the network resolver.
//! Environment overrides are merged by the caller before a run, never inside
//! the pipeline.

// Sub-modules
pub mod env;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use env::is_truthy;
pub use types::{FontResolverConfig, ProcessingOptions};
