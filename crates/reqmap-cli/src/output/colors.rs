//! Terminal color support.
//!
//! Colors are used only when both stdout and stderr are terminals and
//! NO_COLOR is unset.

use std::env;
use std::io::{self, IsTerminal};

/// ANSI styles used by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Green,
    Yellow,
    Red,
    Dim,
    Bold,
}

/// Color support detection and formatting
#[derive(Debug, Clone, Copy)]
pub struct ColorSupport {
    enabled: bool,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Green => "32",
            Style::Yellow => "33",
            Style::Red => "31",
            Style::Dim => "2",
            Style::Bold => "1",
        }
    }
}

impl ColorSupport {
    pub fn detect() -> Self {
        let no_color = env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        Self {
            enabled: !no_color && io::stdout().is_terminal() && io::stderr().is_terminal(),
        }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", style.code(), text)
        } else {
            text.to_string()
        }
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(Style::Green, text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(Style::Yellow, text)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(Style::Red, text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(Style::Dim, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(Style::Bold, text)
    }
}
