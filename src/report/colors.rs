//! Shared color scheme for terminal output

use crate::coverage::Coverage;
use colored::{ColoredString, Colorize};

/// Structural element colors
pub struct StructureColors;

impl StructureColors {
    pub fn package_name(text: &str) -> ColoredString {
        text.cyan().bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn heading(text: &str) -> ColoredString {
        text.white().bold()
    }

    /// Count/statistics numbers
    pub fn count(text: &str) -> ColoredString {
        text.white().bold()
    }
}

/// Colors keyed on how much of the code is annotated
pub struct CoverageColors;

impl CoverageColors {
    pub const GOOD: f64 = 80.0;
    pub const FAIR: f64 = 50.0;

    pub fn colored(coverage: Coverage) -> ColoredString {
        let text = coverage.to_string();
        match coverage.percent() {
            Some(p) if p >= Self::GOOD => text.green().bold(),
            Some(p) if p >= Self::FAIR => text.yellow(),
            Some(_) => text.red(),
            None => text.dimmed(),
        }
    }

    pub fn flag(value: bool) -> ColoredString {
        if value {
            "Yes".green()
        } else {
            "No".red()
        }
    }
}

/// Bar chart characters for summary display
pub struct ChartChars;

impl ChartChars {
    pub const FILLED: char = '█';
    pub const EMPTY: char = '░';

    pub fn bar(percentage: f64, width: usize) -> String {
        let filled = ((percentage / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        let empty = width - filled;
        format!(
            "{}{}",
            Self::FILLED.to_string().repeat(filled),
            Self::EMPTY.to_string().repeat(empty)
        )
    }

    /// A bar for a coverage value; the sentinel draws an empty bar
    pub fn coverage_bar(coverage: Coverage, width: usize) -> String {
        Self::bar(coverage.percent().unwrap_or(0.0), width)
    }
}

pub struct BoxChars;

impl BoxChars {
    pub fn heavy_line(width: usize) -> String {
        "━".repeat(width)
    }

    pub fn light_line(width: usize) -> String {
        "─".repeat(width)
    }
}
