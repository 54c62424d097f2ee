//! Pipeline driver
//!
//! Owns the ordered registry and runs it against one document at a time.

use scraper::Html;

use crate::config::ProcessingOptions;
use crate::font_optimizer::FontOptimizer;
use crate::image_preload::ImagePreloader;

use super::context::RenderContext;
use super::errors::{PostProcessError, PostProcessResult};
use super::stage::{Gate, MiddlewareEntry, PendingMutation, PostProcessStage};

/// Registry name of the font inlining stage in `with_default_stages`
pub const FONT_OPTIMIZER_STAGE: &str = "font-optimizer";

/// Registry name of the image preload stage in `with_default_stages`
pub const IMAGE_PRELOAD_STAGE: &str = "image-preload";

/// Ordered, gated set of post-processing stages
///
/// Stages are registered once at startup and the processor is then shared
/// (typically behind an `Arc`) by every render. `run` takes `&self`, so
/// concurrent runs never observe each other.
#[derive(Default)]
pub struct PostProcessor {
    entries: Vec<MiddlewareEntry>,
}

impl PostProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor with the built-in stages, each gated on its option
    #[must_use]
    pub fn with_default_stages() -> Self {
        let fonts_gate: Gate = Box::new(ProcessingOptions::fonts_enabled);
        let images_gate: Gate = Box::new(ProcessingOptions::images_enabled);

        let mut processor = Self::new();
        processor.push(
            FONT_OPTIMIZER_STAGE.to_string(),
            FontOptimizer::new(),
            Some(fonts_gate),
        );
        processor.push(
            IMAGE_PRELOAD_STAGE.to_string(),
            ImagePreloader::new(),
            Some(images_gate),
        );
        processor
    }

    /// Append a stage that runs for every set of options
    ///
    /// # Errors
    ///
    /// Returns `InvalidStageName` if `name` is empty.
    pub fn register<S>(&mut self, name: impl Into<String>, stage: S) -> PostProcessResult<&mut Self>
    where
        S: PostProcessStage + 'static,
    {
        let name = validate_name(name.into())?;
        self.push(name, stage, None);
        Ok(self)
    }

    /// Append a stage that only runs when `gate` returns true
    ///
    /// # Errors
    ///
    /// Returns `InvalidStageName` if `name` is empty.
    pub fn register_gated<S, G>(
        &mut self,
        name: impl Into<String>,
        stage: S,
        gate: G,
    ) -> PostProcessResult<&mut Self>
    where
        S: PostProcessStage + 'static,
        G: Fn(&ProcessingOptions) -> bool + Send + Sync + 'static,
    {
        let name = validate_name(name.into())?;
        self.push(name, stage, Some(Box::new(gate)));
        Ok(self)
    }

    fn push<S>(&mut self, name: String, stage: S, gate: Option<Gate>)
    where
        S: PostProcessStage + 'static,
    {
        log::debug!("Registered post-processor stage '{name}' (gated: {})", gate.is_some());
        self.entries.push(MiddlewareEntry {
            name,
            stage: Box::new(stage),
            gate,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered stage names in run order
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Run every enabled stage over `markup`
    ///
    /// The markup is parsed once. Every enabled stage inspects that document
    /// before any mutation runs; the document is dropped, then mutations are
    /// awaited in registration order, each receiving the previous output.
    /// Inspect results cannot differ from an interleaved order because the
    /// document is never modified.
    ///
    /// # Errors
    ///
    /// The first failing stage aborts the run. No partial markup is returned.
    /// Since every inspect runs before any mutate, an inspect failure in a
    /// later stage means no earlier stage has mutated yet, so resolvers those
    /// mutations would call are never reached.
    pub async fn run(
        &self,
        markup: String,
        context: &RenderContext,
        options: &ProcessingOptions,
    ) -> PostProcessResult<String> {
        if self.entries.is_empty() {
            return Ok(markup);
        }

        // Html is not Send; keep it out of the await points below
        let pending: Vec<(&str, PendingMutation<'_>)> = {
            let document = Html::parse_document(&markup);
            let mut pending = Vec::with_capacity(self.entries.len());
            for entry in &self.entries {
                if !entry.is_enabled(options) {
                    log::debug!("Skipping stage '{}': gate closed", entry.name);
                    continue;
                }
                let mutation = entry
                    .stage
                    .prepare(&document, context)
                    .map_err(|e| PostProcessError::inspect(&entry.name, e))?;
                pending.push((entry.name.as_str(), mutation));
            }
            pending
        };

        let mut markup = markup;
        for (name, mutation) in pending {
            let before = markup.len();
            markup = mutation(markup)
                .await
                .map_err(|e| PostProcessError::mutate(name, e))?;
            log::debug!("Stage '{name}' done ({before} -> {} bytes)", markup.len());
        }

        Ok(markup)
    }
}

fn validate_name(name: String) -> PostProcessResult<String> {
    if name.trim().is_empty() {
        return Err(PostProcessError::InvalidStageName);
    }
    Ok(name)
}

impl std::fmt::Debug for PostProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}
