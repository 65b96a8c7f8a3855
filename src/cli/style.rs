//! Terminal styling helpers
//!
//! Color/weight styling goes through anstream, which strips styles when
//! stdout is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize as _;

/// Check mark symbol (unstyled)
pub const CHECK: &str = "✓";

/// Extension trait for styled display strings
pub trait Stylize: std::fmt::Display + Sized {
    /// De-emphasized secondary text
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Emphasized text
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Accented value (names, numbers, URLs)
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Success text
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Warning text
    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

impl<T: std::fmt::Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.green().to_string()
}

/// Spinner style for long-running operations
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
