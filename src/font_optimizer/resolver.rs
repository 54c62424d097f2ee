//! Font CSS resolution
//!
//! The font stage never fetches anything itself. It asks a `FontCssResolver`
//! for the `@font-face` text behind a provider stylesheet URL. `None` means
//! "no data": the stage then keeps the browser loading the stylesheet
//! through a plain link. An `Err` aborts the pipeline run.

use anyhow::{Context, Result};
use futures::future::{self, BoxFuture};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Source of font-face CSS for provider stylesheet URLs
pub trait FontCssResolver: Send + Sync {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Option<String>>>;
}

/// Synchronous lookups, e.g. `|url| manifest.get(url).cloned()`
impl<F> FontCssResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(future::ready(Ok(self(url))))
    }
}

/// Entry of a build-time font manifest
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    url: String,
    content: String,
}

/// Precomputed URL → CSS map, typically written at build time
#[derive(Debug, Clone, Default)]
pub struct FontManifest {
    entries: HashMap<String, String>,
}

impl FontManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest of the form `[{"url": "...", "content": "..."}]`
    ///
    /// Later entries for the same URL replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the manifest shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<ManifestEntry> =
            serde_json::from_str(json).context("Invalid font manifest JSON")?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.url, entry.content))
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid manifest.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read font manifest {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn insert(&mut self, url: impl Into<String>, css: impl Into<String>) {
        self.entries.insert(url.into(), css.into());
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for FontManifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl FontCssResolver for FontManifest {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        let css = self.get(url).map(str::to_string);
        if css.is_none() {
            log::debug!("Font manifest has no entry for {url}");
        }
        Box::pin(future::ready(Ok(css)))
    }
}
