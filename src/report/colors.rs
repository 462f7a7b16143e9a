//! Centralized color scheme for consistent output formatting

use colored::{ColoredString, Colorize};

/// Structural element colors
pub struct StructureColors;

impl StructureColors {
    /// Values file header
    pub fn source(text: &str) -> ColoredString {
        text.cyan().bold()
    }

    /// Dotted key path
    pub fn key_path(text: &str) -> ColoredString {
        text.white().bold()
    }

    /// Count/statistics numbers
    pub fn count(text: &str) -> ColoredString {
        text.white().bold()
    }

    /// Bullets and separators
    pub fn marker(text: &str) -> ColoredString {
        text.dimmed()
    }
}

/// Bar chart characters for summary display
pub struct ChartChars;

impl ChartChars {
    pub const FILLED: char = '█';
    pub const EMPTY: char = '░';

    /// Create a progress bar string
    pub fn bar(percentage: f64, width: usize) -> String {
        let filled = ((percentage / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        let empty = width.saturating_sub(filled);
        format!(
            "{}{}",
            Self::FILLED.to_string().repeat(filled),
            Self::EMPTY.to_string().repeat(empty)
        )
    }
}

/// Box drawing characters
pub struct BoxChars;

impl BoxChars {
    /// Heavy separator line
    pub fn heavy_line(width: usize) -> String {
        "━".repeat(width)
    }
}
