//! Terminal output formatting.
//!
//! Command results are printed to stdout; warnings and errors to stderr so
//! that `pack resolve --json` and friends stay machine readable.

pub mod colors;
pub mod errors;
pub mod tree;

use pack_core::error::{PackError, PackResult};
use serde::Serialize;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self::with_colors(colors::ColorSupport::detect())
    }

    pub fn with_colors(colors: colors::ColorSupport) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &colors::ColorSupport {
        &self.colors
    }

    /// Print a line of command output as is
    pub fn line(&self, message: &str) {
        println!("{}", message);
    }

    /// Print a secondary message
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize>(&self, value: &T) -> PackResult<()> {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|e| PackError::io("Failed to serialize output", e.into()))?;
        println!("{}", rendered);
        Ok(())
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
