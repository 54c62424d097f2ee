//! Per-render context handed to every stage

use std::fmt;
use std::sync::Arc;

use crate::font_optimizer::FontCssResolver;

/// Capabilities supplied by the renderer for one or many runs
///
/// The pipeline only reads from the context. Cloning is cheap; the resolver
/// is shared behind an `Arc`.
#[derive(Clone, Default)]
pub struct RenderContext {
    font_resolver: Option<Arc<dyn FontCssResolver>>,
}

impl RenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a font CSS resolver, enabling the font stage's inlining
    #[must_use]
    pub fn with_font_resolver<R>(self, resolver: R) -> Self
    where
        R: FontCssResolver + 'static,
    {
        self.with_shared_font_resolver(Arc::new(resolver))
    }

    /// Attach a resolver that is already shared with other contexts
    #[must_use]
    pub fn with_shared_font_resolver(mut self, resolver: Arc<dyn FontCssResolver>) -> Self {
        self.font_resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn font_resolver(&self) -> Option<&dyn FontCssResolver> {
        self.font_resolver.as_deref()
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("font_resolver", &self.font_resolver.is_some())
            .finish()
    }
}
