//! String-level markup splicing
//!
//! Stages never re-serialize the parsed tree. They edit the markup string at
//! fixed markers, so every helper here works on the first occurrence only and
//! leaves the markup untouched when the marker is missing.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;

/// Insert `snippet` immediately before the first occurrence of `marker`.
///
/// Returns the markup unchanged (borrowed) when the marker is absent.
#[inline]
pub fn insert_before<'a>(markup: &'a str, marker: &str, snippet: &str) -> Cow<'a, str> {
    match markup.find(marker) {
        Some(idx) => {
            let mut out = String::with_capacity(markup.len() + snippet.len());
            out.push_str(&markup[..idx]);
            out.push_str(snippet);
            out.push_str(&markup[idx..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(markup),
    }
}

/// Replace the first occurrence of `marker` with `replacement`.
#[inline]
pub fn replace_first<'a>(markup: &'a str, marker: &str, replacement: &str) -> Cow<'a, str> {
    if markup.contains(marker) {
        Cow::Owned(markup.replacen(marker, replacement, 1))
    } else {
        Cow::Borrowed(markup)
    }
}

/// Escape a value for use inside a double-quoted attribute.
#[inline]
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

lazy_static! {
    /// A whole `<link ...>` tag; quoted values may contain `>`
    static ref LINK_TAG: Regex = Regex::new(r#"<link\b(?:[^>"']|"[^"]*"|'[^']*')*>"#)
        .expect("BUG: hardcoded link tag pattern is invalid");

    /// One `name=value` attribute, value double-, single- or un-quoted
    static ref TAG_ATTRIBUTE: Regex =
        Regex::new(r#"\s([^\s"'>/=]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
            .expect("BUG: hardcoded attribute pattern is invalid");
}

/// Byte range of the first `<link>` tag whose `name` attribute equals `value`
///
/// Attribute values are compared as written and with character references
/// decoded, so `&amp;` in the markup matches `&` in `value`. The comparison is
/// exact: a value never matches a longer one sharing its prefix.
pub fn find_link_with_attr(markup: &str, name: &str, value: &str) -> Option<Range<usize>> {
    LINK_TAG
        .find_iter(markup)
        .find(|tag| tag_attr_equals(tag.as_str(), name, value))
        .map(|tag| tag.range())
}

fn tag_attr_equals(tag: &str, name: &str, value: &str) -> bool {
    TAG_ATTRIBUTE.captures_iter(tag).any(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return false;
        }
        let raw = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        raw == value || html_escape::decode_html_entities(raw) == value
    })
}
