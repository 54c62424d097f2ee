//! Environment-derived overrides
//!
//! Overrides can only switch an option on. An unset or unrecognized value
//! leaves the explicit option as it was.

use crate::utils::{ENV_OPTIMIZE_FONTS, ENV_OPTIMIZE_IMAGES};

use super::types::ProcessingOptions;

/// Interpret an environment value as a boolean flag
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl ProcessingOptions {
    /// Merge overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary lookup
    ///
    /// `with_env_overrides` delegates here; tests pass a closure instead of
    /// touching the process environment.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup(ENV_OPTIMIZE_FONTS).is_some_and(|v| is_truthy(&v)) {
            log::debug!("{ENV_OPTIMIZE_FONTS} set, enabling font optimization");
            self.optimize_fonts = true;
        }
        if lookup(ENV_OPTIMIZE_IMAGES).is_some_and(|v| is_truthy(&v)) {
            log::debug!("{ENV_OPTIMIZE_IMAGES} set, enabling image preloads");
            self.optimize_images = true;
        }
        self
    }
}
