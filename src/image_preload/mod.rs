//! Image preload hint stage
//!
//! Adds `<link rel="preload" as="image">` for the first eligible images so
//! the browser starts fetching them before layout. Hints go in front of the
//! document's first existing preload link, or before `</head>` when there is
//! none.

pub mod processors;

use anyhow::Result;
use futures::future::BoxFuture;
use scraper::Html;

use crate::postprocess::{PostProcessStage, RenderContext};
use crate::utils::{
    HEAD_CLOSE_MARKER, MAXIMUM_IMAGE_PRELOADS, PRELOAD_LINK_MARKER, escape_attr,
    find_link_with_attr, insert_before,
};

pub use processors::extract_preload_candidates;

/// Image preload stage
#[derive(Debug, Clone)]
pub struct ImagePreloader {
    limit: usize,
}

impl Default for ImagePreloader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagePreloader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            limit: MAXIMUM_IMAGE_PRELOADS,
        }
    }

    /// Preload at most `limit` images per document
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl PostProcessStage for ImagePreloader {
    type Data = Vec<String>;

    fn inspect(&self, document: &Html, _context: &RenderContext) -> Result<Self::Data> {
        Ok(extract_preload_candidates(document, self.limit))
    }

    fn mutate<'a>(
        &'a self,
        markup: String,
        sources: Self::Data,
        _context: &'a RenderContext,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move { Ok(insert_preload_hints(markup, &sources)) })
    }
}

/// Insert preload links for `sources` not already linked from the markup
#[must_use]
pub fn insert_preload_hints(markup: String, sources: &[String]) -> String {
    let mut tags = String::new();
    for src in sources {
        if find_link_with_attr(&markup, "href", src).is_some() {
            log::debug!("Preload for {src} already present");
            continue;
        }
        tags.push_str(&format!(
            r#"<link rel="preload" href="{}" as="image"/>"#,
            escape_attr(src)
        ));
    }

    if tags.is_empty() {
        return markup;
    }

    let marker = if markup.contains(PRELOAD_LINK_MARKER) {
        PRELOAD_LINK_MARKER
    } else {
        HEAD_CLOSE_MARKER
    };
    insert_before(&markup, marker, &tags).into_owned()
}
