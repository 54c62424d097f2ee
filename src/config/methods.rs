//! Accessors and builder-style setters for `ProcessingOptions`

use anyhow::{Context, Result};
use std::path::Path;

use super::types::ProcessingOptions;

impl ProcessingOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn optimize_fonts(mut self, enabled: bool) -> Self {
        self.optimize_fonts = enabled;
        self
    }

    #[must_use]
    pub fn optimize_images(mut self, enabled: bool) -> Self {
        self.optimize_images = enabled;
        self
    }

    #[must_use]
    pub fn fonts_enabled(&self) -> bool {
        self.optimize_fonts
    }

    #[must_use]
    pub fn images_enabled(&self) -> bool {
        self.optimize_images
    }

    /// Parse options from the renderer's JSON representation
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has fields of the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid processing options JSON")
    }

    /// Load options from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        Self::from_json(&raw)
    }
}
