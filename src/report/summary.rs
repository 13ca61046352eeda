//! Summary reporter - averages across every analyzed package

use crate::analysis::{CoverageData, PackageReport};
use crate::coverage::Coverage;
use crate::report::colors::{BoxChars, ChartChars, CoverageColors, StructureColors};
use colored::Colorize;

/// Cross-package averages; packages whose figure is `N/A` are left out of
/// that figure's mean
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub packages: usize,
    pub with_typeshed: usize,
    pub with_stubs_package: usize,
    pub with_py_typed: usize,
    pub skipped_files: usize,
    pub parameter: Coverage,
    pub returns: Coverage,
    pub parameter_with_stubs: Coverage,
    pub returns_with_stubs: Coverage,
    pub parameter_with_tests: Coverage,
    pub returns_with_tests: Coverage,
}

impl SummaryStats {
    pub fn from_reports(reports: &[PackageReport]) -> Self {
        let mean = |pick: fn(&CoverageData) -> Coverage| {
            let values: Vec<f64> = reports
                .iter()
                .filter_map(|r| pick(&r.coverage_data).percent())
                .collect();
            if values.is_empty() {
                Coverage::NotApplicable
            } else {
                Coverage::Percent(values.iter().sum::<f64>() / values.len() as f64)
            }
        };

        Self {
            packages: reports.len(),
            with_typeshed: reports.iter().filter(|r| r.has_type_shed).count(),
            with_stubs_package: reports.iter().filter(|r| r.has_stubs_package).count(),
            with_py_typed: reports.iter().filter(|r| r.has_py_typed_file).count(),
            skipped_files: reports.iter().map(|r| r.coverage_data.skipped_files).sum(),
            parameter: mean(|d| d.parameter_coverage),
            returns: mean(|d| d.return_type_coverage),
            parameter_with_stubs: mean(|d| d.parameter_coverage_with_stubs),
            returns_with_stubs: mean(|d| d.return_type_coverage_with_stubs),
            parameter_with_tests: mean(|d| d.param_coverage_with_tests),
            returns_with_tests: mean(|d| d.return_coverage_with_tests),
        }
    }
}

/// Summary-only reporter with bar charts
pub struct SummaryReporter {
    bar_width: usize,
}

impl SummaryReporter {
    pub fn new() -> Self {
        Self { bar_width: 20 }
    }

    pub fn report(&self, reports: &[PackageReport]) {
        println!();
        println!("{}", "Type Coverage Summary".cyan().bold());
        println!("{}", BoxChars::heavy_line(50));
        println!();

        if reports.is_empty() {
            println!("{}", "No packages analyzed.".yellow());
            return;
        }

        let stats = SummaryStats::from_reports(reports);
        self.print_counts(&stats);
        println!();
        self.print_averages(&stats);
        println!();
    }

    fn print_counts(&self, stats: &SummaryStats) {
        let label_width = 22;
        let rows = [
            ("Packages analyzed:", stats.packages),
            ("With typeshed stubs:", stats.with_typeshed),
            ("With stubs package:", stats.with_stubs_package),
            ("With py.typed:", stats.with_py_typed),
            ("Skipped files:", stats.skipped_files),
        ];
        for (label, value) in rows {
            println!(
                "{:>width$}  {}",
                label.dimmed(),
                StructureColors::count(&format_number(value)),
                width = label_width
            );
        }
    }

    fn print_averages(&self, stats: &SummaryStats) {
        println!("{}", StructureColors::heading("Average coverage:"));
        let rows = [
            ("Parameters", stats.parameter),
            ("Returns", stats.returns),
            ("Parameters w/ stubs", stats.parameter_with_stubs),
            ("Returns w/ stubs", stats.returns_with_stubs),
            ("Parameters w/ tests", stats.parameter_with_tests),
            ("Returns w/ tests", stats.returns_with_tests),
        ];
        for (label, coverage) in rows {
            println!(
                "  {:<20} {} {}",
                label,
                ChartChars::coverage_bar(coverage, self.bar_width),
                CoverageColors::colored(coverage)
            );
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
