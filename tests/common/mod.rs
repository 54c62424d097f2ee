//! Shared fixtures and stub stages for the post-processing test suite

use anyhow::{Result, anyhow};
use futures::future::{self, BoxFuture};
use kodegen_tools_postprocess::{FontCssResolver, PostProcessStage, RenderContext};
use scraper::Html;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const GOOGLE_INTER: &str = "https://fonts.googleapis.com/css2?family=Inter";
pub const GOOGLE_ROBOTO: &str = "https://fonts.googleapis.com/css?family=Roboto:400,700&display=swap";
pub const TYPEKIT_KIT: &str = "https://use.typekit.net/abc1def.css";

/// Renderer-shaped document with the preconnect placeholder in `<head>`
#[allow(dead_code)]
pub fn document_with_links(links: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"/><meta name="next-font-preconnect"/>{links}<title>Test</title></head><body><main>content</main></body></html>"#
    )
}

/// Stylesheet link as the renderer emits it for provider fonts
#[allow(dead_code)]
pub fn font_link(url: &str, nonce: Option<&str>) -> String {
    let href = html_escape_attr(url);
    match nonce {
        Some(nonce) => format!(r#"<link rel="stylesheet" data-href="{href}" nonce="{nonce}"/>"#),
        None => format!(r#"<link rel="stylesheet" data-href="{href}"/>"#),
    }
}

#[allow(dead_code)]
pub fn html_escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Resolver returning `@font-face{/* URL */}` for every URL and counting calls
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CountingResolver {
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingResolver {
    pub fn css_for(url: &str) -> String {
        format!("@font-face{{/* {url} */}}")
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FontCssResolver for CountingResolver {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(future::ready(Ok(Some(Self::css_for(url)))))
    }
}

/// Resolver that always fails
#[allow(dead_code)]
pub struct FailingResolver;

impl FontCssResolver for FailingResolver {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(future::ready(Err(anyhow!("provider unreachable: {url}"))))
    }
}

/// Stage appending `tag` to the markup and counting both halves
#[allow(dead_code)]
#[derive(Clone)]
pub struct CountingStage {
    pub tag: &'static str,
    pub inspects: Arc<AtomicUsize>,
    pub mutates: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingStage {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            inspects: Arc::new(AtomicUsize::new(0)),
            mutates: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn inspects(&self) -> usize {
        self.inspects.load(Ordering::SeqCst)
    }

    pub fn mutates(&self) -> usize {
        self.mutates.load(Ordering::SeqCst)
    }
}

impl PostProcessStage for CountingStage {
    /// Number of `<p>` elements in the parsed document
    type Data = usize;

    fn inspect(&self, document: &Html, _context: &RenderContext) -> Result<usize> {
        self.inspects.fetch_add(1, Ordering::SeqCst);
        let selector = scraper::Selector::parse("p").map_err(|e| anyhow!("{e}"))?;
        Ok(document.select(&selector).count())
    }

    fn mutate<'a>(
        &'a self,
        markup: String,
        paragraphs: usize,
        _context: &'a RenderContext,
    ) -> BoxFuture<'a, Result<String>> {
        self.mutates.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move { Ok(format!("{markup}[{}:{paragraphs}]", self.tag)) })
    }
}

/// Stage whose inspect or mutate fails on demand
#[allow(dead_code)]
pub struct FailingStage {
    pub fail_inspect: bool,
}

impl PostProcessStage for FailingStage {
    type Data = ();

    fn inspect(&self, _document: &Html, _context: &RenderContext) -> Result<()> {
        if self.fail_inspect {
            return Err(anyhow!("inspect exploded"));
        }
        Ok(())
    }

    fn mutate<'a>(
        &'a self,
        _markup: String,
        _data: (),
        _context: &'a RenderContext,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(future::ready(Err(anyhow!("mutate exploded"))))
    }
}
