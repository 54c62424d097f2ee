//! Markup mutation for the font stage
//!
//! Works on the serialized markup only. Every edit is anchored on a fixed
//! marker (`</head>`, the preconnect placeholder, the candidate's own link),
//! and each candidate is checked against markers left by earlier passes so
//! re-running over already optimized output changes nothing.

use anyhow::{Context, Result};
use std::borrow::Cow;

use crate::utils::{
    FONT_PRECONNECT_PLACEHOLDER, HEAD_CLOSE_MARKER, escape_attr, find_link_with_attr,
    insert_before, replace_first,
};

use super::processors::FontCandidate;
use super::providers::{FontProvider, find_provider};
use super::resolver::FontCssResolver;

/// Inline resolved font CSS for every candidate and fill the preconnect placeholder
///
/// # Errors
///
/// Returns an error if the resolver fails for any candidate.
pub async fn inline_font_css(
    markup: String,
    candidates: &[FontCandidate],
    resolver: &dyn FontCssResolver,
    providers: &[FontProvider],
) -> Result<String> {
    let mut result = markup;
    let mut preconnects: Vec<&str> = Vec::new();

    for candidate in candidates {
        let href = escape_attr(&candidate.url);
        let fallback_link = fallback_link_tag(&href);

        if is_already_optimized(&result, &href, &fallback_link) {
            log::debug!("Font already optimized, skipping: {}", candidate.url);
            continue;
        }
        // Without `</head>` the candidate is left as is: no resolve, no link
        // removal, no preconnect. Removing the link would drop the font.
        if !result.contains(HEAD_CLOSE_MARKER) {
            log::debug!("No {HEAD_CLOSE_MARKER} in markup, leaving {}", candidate.url);
            continue;
        }

        let css = resolver
            .resolve(&candidate.url)
            .await
            .with_context(|| format!("Failed to resolve font CSS for {}", candidate.url))?;

        match css.filter(|css| !css.is_empty()) {
            None => {
                log::warn!("No font CSS for {}, keeping stylesheet link", candidate.url);
                result = insert_before(&result, HEAD_CLOSE_MARKER, &fallback_link).into_owned();
            }
            Some(css) => {
                let style = style_tag(&href, candidate.nonce.as_deref(), &css);
                result = insert_before(&result, HEAD_CLOSE_MARKER, &style).into_owned();
                result = remove_font_link(&result, &candidate.url).into_owned();

                if let Some(provider) = find_provider(providers, &candidate.url) {
                    let origin = provider.preconnect_origin.as_ref();
                    if !preconnects.contains(&origin) {
                        preconnects.push(origin);
                    }
                }
                log::debug!("Inlined {} bytes of font CSS for {}", css.len(), candidate.url);
            }
        }
    }

    let preconnect_tags: String = preconnects
        .iter()
        .map(|origin| preconnect_tag(origin))
        .collect();
    Ok(replace_first(&result, FONT_PRECONNECT_PLACEHOLDER, &preconnect_tags).into_owned())
}

/// `<link rel="stylesheet" href="URL"/>`, the plain link kept when CSS is unavailable
#[inline]
fn fallback_link_tag(escaped_href: &str) -> String {
    format!(r#"<link rel="stylesheet" href="{escaped_href}"/>"#)
}

#[inline]
fn style_tag(escaped_href: &str, nonce: Option<&str>, css: &str) -> String {
    match nonce {
        Some(nonce) => format!(
            r#"<style data-href="{escaped_href}" nonce="{}">{css}</style>"#,
            escape_attr(nonce)
        ),
        None => format!(r#"<style data-href="{escaped_href}">{css}</style>"#),
    }
}

#[inline]
fn preconnect_tag(origin: &str) -> String {
    format!(
        r#"<link rel="preconnect" href="{}" crossorigin />"#,
        escape_attr(origin)
    )
}

/// True when a previous pass already inlined or linked this URL
///
/// The inlined form is `<style data-href="URL">` or `<style data-href="URL" nonce=...>`.
fn is_already_optimized(markup: &str, escaped_href: &str, fallback_link: &str) -> bool {
    if markup.contains(fallback_link) {
        return true;
    }
    let open = format!(r#"<style data-href="{escaped_href}""#);
    markup
        .match_indices(open.as_str())
        .any(|(idx, _)| matches!(markup.as_bytes().get(idx + open.len()), Some(b'>' | b' ')))
}

/// Remove the first `<link>` whose `data-href` is exactly `url`
///
/// The URL is compared as a plain string after entity decoding, so `?`, `.`
/// or `(` in query strings need no escaping and a URL never matches a longer one.
fn remove_font_link<'a>(markup: &'a str, url: &str) -> Cow<'a, str> {
    match find_link_with_attr(markup, "data-href", url) {
        Some(range) => {
            let mut out = String::with_capacity(markup.len() - range.len());
            out.push_str(&markup[..range.start]);
            out.push_str(&markup[range.end..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(markup),
    }
}
