//! Error and diagnostic formatting with actionable suggestions.

use std::error::Error;

use reqmap_core::error::ReqmapError;
use reqmap_resolver::Diagnostic;

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

    /// Error line, then an optional help line and the cause chain
    pub fn format_error(&self, error: &ReqmapError) -> String {
        let mut output = format!("{}: {}", self.colors.red("error"), error);

        if let Some(suggestion) = error.suggestion() {
            output.push_str(&format!("\n{}: {}", self.colors.dim("help"), suggestion));
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push_str(&format!("\n{}: {}", self.colors.dim("caused by"), err));
            source = err.source();
        }

        output
    }

    /// One merge diagnostic; conflicts are warnings, the rest notes
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let label = if diagnostic.is_conflict() {
            self.colors.yellow("warning")
        } else {
            self.colors.dim("note")
        };
        format!("{}: {}", label, diagnostic)
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
