//! Shared markup markers and configuration constants
//!
//! The markers are the fixed splice points the renderer leaves in its output.
//! Stages search for them as plain strings; only the first occurrence is used.

/// Closing head tag, insertion point for inlined styles and resource hints
pub const HEAD_CLOSE_MARKER: &str = "</head>";

/// Placeholder the renderer emits where font preconnect hints belong
///
/// Replaced exactly once per font pass, with an empty string when no
/// provider origins were collected.
pub const FONT_PRECONNECT_PLACEHOLDER: &str = r#"<meta name="next-font-preconnect"/>"#;

/// Opening of an existing preload hint, preferred insertion point for image preloads
pub const PRELOAD_LINK_MARKER: &str = r#"<link rel="preload""#;

/// Environment variable that forces font optimization on
pub const ENV_OPTIMIZE_FONTS: &str = "POSTPROCESS_OPTIMIZE_FONTS";

/// Environment variable that forces image preload hints on
pub const ENV_OPTIMIZE_IMAGES: &str = "POSTPROCESS_OPTIMIZE_IMAGES";

/// Maximum number of images that receive a preload hint per document
pub const MAXIMUM_IMAGE_PRELOADS: usize = 2;

/// Images whose declared `width * height` is at or below this are not preloaded
///
/// 2500 px² covers icons and avatars up to 50x50.
pub const IMAGE_PRELOAD_SIZE_THRESHOLD: u64 = 2500;

/// Default timeout for font stylesheet requests: 10 seconds
pub const DEFAULT_FONT_TIMEOUT_SECS: u64 = 10;

/// Maximum size for downloaded font stylesheets (bytes)
///
/// Provider responses are `@font-face` blocks only, typically 1-30KB even
/// for families with many subsets.
pub const DEFAULT_MAX_FONT_CSS_SIZE: usize = 512 * 1024;

/// Number of font stylesheet URLs kept in the resolver cache
pub const DEFAULT_FONT_CACHE_CAPACITY: usize = 256;

/// Chrome user agent string sent to font providers
///
/// Font services sniff the user agent and serve woff2 `@font-face` rules only
/// to browsers they recognize. Without it they fall back to legacy ttf sources.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
