mod colors;
mod html;
mod json;
mod summary;
mod terminal;

pub use html::{gradient_color, HtmlReporter};
pub use json::JsonReporter;
pub use summary::{format_number, SummaryReporter, SummaryStats};
pub use terminal::TerminalReporter;

use crate::analysis::PackageReport;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One block per package
    #[default]
    Terminal,
    /// Averages across packages
    Summary,
    /// `package_report.json`
    Json,
    /// `index.html` table
    Html,
}

/// Options for report generation
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub json_path: PathBuf,
    pub html_path: PathBuf,
    /// Include the typeshed-stats block in terminal output
    pub show_typeshed_stats: bool,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self {
            json_path: PathBuf::from("package_report.json"),
            html_path: PathBuf::from("index.html"),
            show_typeshed_stats: true,
        }
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Reporter for package coverage results
pub struct Reporter {
    format: ReportFormat,
    options: ReportOptions,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            options: ReportOptions::default(),
        }
    }

    pub fn with_options(format: ReportFormat, options: ReportOptions) -> Self {
        Self { format, options }
    }

    pub fn report(&self, reports: &[PackageReport]) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => {
                TerminalReporter::new()
                    .with_typeshed_stats(self.options.show_typeshed_stats)
                    .report(reports);
                Ok(())
            }
            ReportFormat::Summary => {
                SummaryReporter::new().report(reports);
                Ok(())
            }
            ReportFormat::Json => JsonReporter::new(self.options.json_path.clone()).report(reports),
            ReportFormat::Html => HtmlReporter::new(self.options.html_path.clone()).report(reports),
        }
    }
}
