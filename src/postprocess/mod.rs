//! Staged HTML post-processing
//!
//! A `PostProcessor` is an ordered registry of named stages. Each run parses
//! the markup once, lets every enabled stage inspect the parsed document, and
//! threads the markup string through the stages' mutations in order.

// Sub-modules
pub mod context;
pub mod errors;
pub mod pipeline;
pub mod stage;

// Re-exports for public API
pub use context::RenderContext;
pub use errors::{PostProcessError, PostProcessResult, StageFailure};
pub use pipeline::{FONT_OPTIMIZER_STAGE, IMAGE_PRELOAD_STAGE, PostProcessor};
pub use stage::{Gate, PostProcessStage};
