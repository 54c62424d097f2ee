//! HTTP font stylesheet resolver
//!
//! Fetches provider stylesheets over the network with a browser user agent,
//! a request timeout and a body size limit, and memoizes results in an LRU
//! cache shared by every render that holds the resolver.
//!
//! ## Miss policy
//!
//! - Unparseable or non-HTTP(S) URL: `None`, cached
//! - Non-success status, oversized body, non-UTF-8 body: `None`, cached
//! - Transport failure or timeout: `None`, not cached (retried next render)
//!
//! The resolver never returns `Err` for network conditions; a font that
//! cannot be fetched degrades to the stage's fallback link.

use anyhow::{Context, Result};
use futures::StreamExt;
use futures::future::BoxFuture;
use lru::LruCache;
use reqwest::Client;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use url::Url;

use crate::config::FontResolverConfig;

use super::resolver::FontCssResolver;

/// Outcome of a single stylesheet fetch
#[derive(Debug)]
enum FetchOutcome {
    /// Stylesheet text
    Css(String),
    /// Definitive miss, safe to cache
    Unavailable(String),
}

/// Network-backed `FontCssResolver` with an LRU cache
pub struct HttpFontResolver {
    client: Client,
    config: FontResolverConfig,
    cache: Mutex<LruCache<String, Option<String>>>,
}

impl HttpFontResolver {
    /// Build a resolver with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: FontResolverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client for font resolver")?;
        Ok(Self::with_client(client, config))
    }

    /// Build a resolver around an existing client
    ///
    /// The client's own settings apply; the configured timeout and user agent
    /// are still set per request.
    #[must_use]
    pub fn with_client(client: Client, config: FontResolverConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            client,
            config,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached URLs
    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn resolve_cached(&self, url: &str) -> Result<Option<String>> {
        if let Some(hit) = self.cache.lock().await.get(url) {
            log::debug!("Font CSS cache hit: {url}");
            return Ok(hit.clone());
        }

        // Lock is released during the fetch; concurrent misses for the same
        // URL may both fetch, the later insert wins.
        match self.fetch(url).await {
            Ok(FetchOutcome::Css(css)) => {
                log::info!("Fetched font CSS from {url} ({} bytes)", css.len());
                self.cache.lock().await.put(url.to_string(), Some(css.clone()));
                Ok(Some(css))
            }
            Ok(FetchOutcome::Unavailable(reason)) => {
                log::warn!("Font CSS unavailable for {url}: {reason}");
                self.cache.lock().await.put(url.to_string(), None);
                Ok(None)
            }
            Err(e) => {
                log::warn!("Failed to fetch font CSS from {url}: {e:#}");
                Ok(None)
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(FetchOutcome::Unavailable(format!("invalid URL: {e}"))),
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return Ok(FetchOutcome::Unavailable(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let response = self
            .client
            .get(parsed)
            .timeout(self.config.timeout)
            .header("User-Agent", self.config.user_agent.as_str())
            .header("Accept", "text/css,*/*;q=0.1")
            .send()
            .await
            .context("Failed to download font CSS")?;

        if !response.status().is_success() {
            return Ok(FetchOutcome::Unavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let max = self.config.max_css_size;
        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > max as u64 {
            return Ok(FetchOutcome::Unavailable(format!(
                "{expected_size} bytes exceeds limit of {max} bytes"
            )));
        }

        let mut buffer = Vec::with_capacity(expected_size as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read font CSS chunk")?;
            if buffer.len() + chunk.len() > max {
                return Ok(FetchOutcome::Unavailable(format!(
                    "body exceeded limit of {max} bytes"
                )));
            }
            buffer.extend_from_slice(&chunk);
        }

        match String::from_utf8(buffer) {
            Ok(css) => Ok(FetchOutcome::Css(css)),
            Err(_) => Ok(FetchOutcome::Unavailable("body is not valid UTF-8".into())),
        }
    }
}

impl FontCssResolver for HttpFontResolver {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(self.resolve_cached(url))
    }
}

impl std::fmt::Debug for HttpFontResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFontResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
