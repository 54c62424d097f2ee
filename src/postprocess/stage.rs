//! Stage contract and its type-erased registry form
//!
//! A stage is an `inspect`/`mutate` pair sharing one intermediate type.
//! `inspect` reads the parsed document; `mutate` edits the markup string.
//! The registry stores stages behind `DynStage`, which fuses the pair into a
//! single `prepare` step so the typed data never leaves the stage.

use anyhow::Result;
use futures::future::BoxFuture;
use scraper::Html;

use crate::config::ProcessingOptions;

use super::context::RenderContext;

/// A unit of the post-processing pipeline
pub trait PostProcessStage: Send + Sync {
    /// Data collected by `inspect` and consumed by `mutate`
    type Data: Send + 'static;

    /// Analyze the shared document. Must not depend on earlier stages' edits,
    /// since the document reflects the input markup only.
    fn inspect(&self, document: &Html, context: &RenderContext) -> Result<Self::Data>;

    /// Produce the next markup from the current one and the inspected data
    fn mutate<'a>(
        &'a self,
        markup: String,
        data: Self::Data,
        context: &'a RenderContext,
    ) -> BoxFuture<'a, Result<String>>;
}

/// Deferred `mutate` call, bound to the data its stage inspected
pub(crate) type PendingMutation<'a> =
    Box<dyn FnOnce(String) -> BoxFuture<'a, Result<String>> + Send + 'a>;

/// Object-safe view of a stage
pub(crate) trait DynStage: Send + Sync {
    fn prepare<'a>(
        &'a self,
        document: &Html,
        context: &'a RenderContext,
    ) -> Result<PendingMutation<'a>>;
}

impl<S> DynStage for S
where
    S: PostProcessStage,
{
    fn prepare<'a>(
        &'a self,
        document: &Html,
        context: &'a RenderContext,
    ) -> Result<PendingMutation<'a>> {
        let data = self.inspect(document, context)?;
        Ok(Box::new(move |markup| self.mutate(markup, data, context)))
    }
}

/// Predicate deciding whether a stage runs for the given options
pub type Gate = Box<dyn Fn(&ProcessingOptions) -> bool + Send + Sync>;

/// A registered stage
pub(crate) struct MiddlewareEntry {
    pub(crate) name: String,
    pub(crate) stage: Box<dyn DynStage>,
    pub(crate) gate: Option<Gate>,
}

impl MiddlewareEntry {
    /// Absent gate means always enabled
    #[inline]
    pub(crate) fn is_enabled(&self, options: &ProcessingOptions) -> bool {
        self.gate.as_ref().is_none_or(|gate| gate(options))
    }
}
