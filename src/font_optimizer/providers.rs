//! Font provider table
//!
//! Maps a font service's stylesheet URL prefix to the origin the browser
//! should preconnect to. The stylesheet host and the font file host differ
//! for some services (Google serves CSS from `fonts.googleapis.com` and the
//! font files from `fonts.gstatic.com`).

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One supported font service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontProvider {
    /// Stylesheet URLs starting with this prefix belong to the provider
    pub url_prefix: Cow<'static, str>,
    /// Origin emitted in the provider's `<link rel="preconnect">`
    pub preconnect_origin: Cow<'static, str>,
}

impl FontProvider {
    #[must_use]
    pub const fn new_static(url_prefix: &'static str, preconnect_origin: &'static str) -> Self {
        Self {
            url_prefix: Cow::Borrowed(url_prefix),
            preconnect_origin: Cow::Borrowed(preconnect_origin),
        }
    }

    #[must_use]
    pub fn new(url_prefix: impl Into<String>, preconnect_origin: impl Into<String>) -> Self {
        Self {
            url_prefix: Cow::Owned(url_prefix.into()),
            preconnect_origin: Cow::Owned(preconnect_origin.into()),
        }
    }

    #[inline]
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        url.starts_with(self.url_prefix.as_ref())
    }
}

/// Built-in providers
pub const DEFAULT_FONT_PROVIDERS: &[FontProvider] = &[
    FontProvider::new_static("https://fonts.googleapis.com/css", "https://fonts.gstatic.com"),
    FontProvider::new_static("https://use.typekit.net", "https://use.typekit.net"),
];

/// First provider whose prefix matches `url`
#[must_use]
pub fn find_provider<'a>(providers: &'a [FontProvider], url: &str) -> Option<&'a FontProvider> {
    providers.iter().find(|provider| provider.matches(url))
}
