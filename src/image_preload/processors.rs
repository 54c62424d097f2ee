//! Preload candidate selection
//!
//! Picks the first images a visitor is likely to see above the fold. Vector
//! images, tiny images and anything under a `hidden` subtree are skipped.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::utils::IMAGE_PRELOAD_SIZE_THRESHOLD;

lazy_static! {
    static ref IMG_SELECTOR: Selector =
        Selector::parse("img[src]").expect("BUG: hardcoded selector 'img[src]' is invalid");
}

/// `src` of the first `limit` eligible images, in document order, deduplicated
pub fn extract_preload_candidates(document: &Html, limit: usize) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();

    for element in document.select(&IMG_SELECTOR) {
        if sources.len() >= limit {
            break;
        }
        if !is_eligible(&element) {
            continue;
        }
        if let Some(src) = element.value().attr("src")
            && !sources.iter().any(|s| s == src)
        {
            sources.push(src.to_string());
        }
    }

    log::debug!("Selected {} images for preload", sources.len());
    sources
}

fn is_eligible(element: &ElementRef<'_>) -> bool {
    let Some(src) = element.value().attr("src") else {
        return false;
    };
    !src.is_empty() && !src.contains(".svg") && !is_too_small(element) && !is_hidden(element)
}

/// Declared area at or below the threshold
///
/// Images without both dimensions, or with dimensions that do not start
/// with a number, are assumed large enough.
fn is_too_small(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    match (
        value.attr("width").and_then(leading_integer),
        value.attr("height").and_then(leading_integer),
    ) {
        (Some(width), Some(height)) => width.saturating_mul(height) <= IMAGE_PRELOAD_SIZE_THRESHOLD,
        _ => false,
    }
}

/// Parse leading ASCII digits, so `"120px"` reads as 120
fn leading_integer(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

fn is_hidden(element: &ElementRef<'_>) -> bool {
    element.value().attr("hidden").is_some()
        || element.ancestors().any(|node| {
            node.value()
                .as_element()
                .is_some_and(|ancestor| ancestor.attr("hidden").is_some())
        })
}
