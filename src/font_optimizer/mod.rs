//! Web-font optimization stage
//!
//! Replaces provider stylesheet links (`<link rel="stylesheet" data-href=...>`)
//! with inline `<style>` blocks holding the provider's `@font-face` rules,
//! and emits `<link rel="preconnect">` hints for the providers actually used.
//! When a stylesheet cannot be resolved, a plain `<link href>` keeps the font
//! loading the usual way.

// Sub-modules
pub mod downloaders;
pub mod inline;
pub mod processors;
pub mod providers;
pub mod resolver;

use anyhow::Result;
use futures::future::BoxFuture;
use scraper::Html;

use crate::postprocess::{PostProcessStage, RenderContext};

// Re-exports for public API
pub use downloaders::HttpFontResolver;
pub use inline::inline_font_css;
pub use processors::{FontCandidate, extract_font_candidates};
pub use providers::{DEFAULT_FONT_PROVIDERS, FontProvider, find_provider};
pub use resolver::{FontCssResolver, FontManifest};

/// Font inlining stage
///
/// A pass-through when the render context carries no font resolver.
#[derive(Debug, Clone)]
pub struct FontOptimizer {
    providers: Vec<FontProvider>,
}

impl Default for FontOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FontOptimizer {
    /// Stage using `DEFAULT_FONT_PROVIDERS`
    #[must_use]
    pub fn new() -> Self {
        Self::with_providers(DEFAULT_FONT_PROVIDERS.to_vec())
    }

    /// Stage recognizing only `providers`
    #[must_use]
    pub fn with_providers(providers: Vec<FontProvider>) -> Self {
        Self { providers }
    }

    #[must_use]
    pub fn providers(&self) -> &[FontProvider] {
        &self.providers
    }
}

impl PostProcessStage for FontOptimizer {
    type Data = Vec<FontCandidate>;

    fn inspect(&self, document: &Html, context: &RenderContext) -> Result<Self::Data> {
        if context.font_resolver().is_none() {
            return Ok(Vec::new());
        }
        Ok(extract_font_candidates(document, &self.providers))
    }

    fn mutate<'a>(
        &'a self,
        markup: String,
        candidates: Self::Data,
        context: &'a RenderContext,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let Some(resolver) = context.font_resolver() else {
                return Ok(markup);
            };
            inline_font_css(markup, &candidates, resolver, &self.providers).await
        })
    }
}
