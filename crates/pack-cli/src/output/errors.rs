//! Error message formatting with actionable suggestions.

use std::error::Error;

use pack_core::error::PackError;

use super::colors::ColorSupport;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self::with_colors(ColorSupport::detect())
    }

    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with its suggestion and source chain
    pub fn format_error(&self, error: &PackError) -> String {
        let mut output = format!("{}: {}\n", self.colors.red("error"), error);

        if let Some(suggestion) = error.suggestion() {
            output.push_str(&format!("{}: {}\n", self.colors.dim("help"), suggestion));
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push_str(&format!("{}: {}\n", self.colors.dim("caused by"), err));
            source = err.source();
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_format_with_suggestion() {
        let formatter = ErrorFormatter::with_colors(ColorSupport::disabled());
        let err = PackError::NotInstalled {
            name: "theme".to_string(),
        };
        let text = formatter.format_error(&err);
        assert!(text.starts_with("error: Pack 'theme' is not installed\n"));
        assert!(text.contains("help: Run 'pack list'"));
    }

    #[test]
    fn test_format_source_chain() {
        let formatter = ErrorFormatter::with_colors(ColorSupport::disabled());
        let err = PackError::io(
            "Failed to read /packs/a/pack.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let text = formatter.format_error(&err);
        assert!(text.contains("caused by: permission denied"));
        assert!(!text.contains("help:"));
    }
}
