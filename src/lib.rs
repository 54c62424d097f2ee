pub mod config;
pub mod font_optimizer;
pub mod image_preload;
pub mod postprocess;
pub mod utils;

pub use config::{FontResolverConfig, ProcessingOptions};
pub use font_optimizer::{
    FontCandidate, FontCssResolver, FontManifest, FontOptimizer, FontProvider, HttpFontResolver,
};
pub use image_preload::ImagePreloader;
pub use postprocess::{
    PostProcessError, PostProcessResult, PostProcessStage, PostProcessor, RenderContext,
};

/// Run the built-in stages over `markup` once
///
/// Convenience for one-off use. Long-lived renderers should build a
/// `PostProcessor` at startup and reuse it.
///
/// # Errors
///
/// Propagates the first stage failure.
pub async fn post_process(
    markup: String,
    context: &RenderContext,
    options: &ProcessingOptions,
) -> PostProcessResult<String> {
    PostProcessor::with_default_stages()
        .run(markup, context, options)
        .await
}
