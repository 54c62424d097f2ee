//! Font candidate extraction from the parsed document

use lazy_static::lazy_static;
use scraper::{Html, Selector};

use super::providers::FontProvider;

lazy_static! {
    // Hardcoded and syntactically valid; a parse failure is a bug in this string.
    static ref FONT_LINK_SELECTOR: Selector =
        Selector::parse(r#"link[rel="stylesheet"][data-href]"#)
            .expect("BUG: hardcoded font link selector is invalid");
}

/// A provider stylesheet link eligible for inlining
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontCandidate {
    /// Value of `data-href`, never empty
    pub url: String,
    /// Value of `nonce`, `None` when missing or empty
    pub nonce: Option<String>,
}

/// Collect font stylesheet links in document order
///
/// A link qualifies when its `rel` is exactly `stylesheet` and its `data-href`
/// starts with one of `providers`' URL prefixes.
pub fn extract_font_candidates(document: &Html, providers: &[FontProvider]) -> Vec<FontCandidate> {
    let mut candidates = Vec::new();

    for element in document.select(&FONT_LINK_SELECTOR) {
        let Some(url) = element.value().attr("data-href") else {
            continue;
        };
        if url.is_empty() || !providers.iter().any(|provider| provider.matches(url)) {
            continue;
        }

        let nonce = element
            .value()
            .attr("nonce")
            .filter(|nonce| !nonce.is_empty())
            .map(str::to_string);

        candidates.push(FontCandidate {
            url: url.to_string(),
            nonce,
        });
    }

    log::debug!("Found {} font stylesheet candidates", candidates.len());
    candidates
}
