//! Core configuration types for post-processing
//!
//! `ProcessingOptions` is immutable for the duration of one pipeline run.
//! Gate predicates receive it by reference and nothing in the pipeline writes
//! to it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_FONT_CACHE_CAPACITY, DEFAULT_FONT_TIMEOUT_SECS,
    DEFAULT_MAX_FONT_CSS_SIZE,
};

/// Switches consulted by stage gates
///
/// Deserializes from the renderer's camelCase JSON (`{"optimizeFonts": true}`);
/// missing fields default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessingOptions {
    /// Inline provider font CSS and emit preconnect hints
    pub(crate) optimize_fonts: bool,
    /// Emit preload hints for the first visible images
    pub(crate) optimize_images: bool,
}

/// Configuration for the HTTP font stylesheet resolver
#[derive(Debug, Clone)]
pub struct FontResolverConfig {
    /// Timeout for a single stylesheet request
    pub timeout: Duration,

    /// Maximum size for a stylesheet body (bytes)
    /// Larger responses resolve to no CSS and fall back to a plain link
    pub max_css_size: usize,

    /// Number of URLs (hits and misses) kept in the LRU cache
    pub cache_capacity: usize,

    /// User agent sent to font providers
    pub user_agent: String,
}

impl Default for FontResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FONT_TIMEOUT_SECS),
            max_css_size: DEFAULT_MAX_FONT_CSS_SIZE,
            cache_capacity: DEFAULT_FONT_CACHE_CAPACITY,
            user_agent: CHROME_USER_AGENT.to_string(),
        }
    }
}
