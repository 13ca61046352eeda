//! Per-package terminal report

use crate::analysis::PackageReport;
use crate::dataset::CompletenessRecord;
use crate::report::colors::{BoxChars, CoverageColors, StructureColors};

/// Prints one coverage block per package
pub struct TerminalReporter {
    /// Include the typeshed-stats block when a record exists
    show_typeshed_stats: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            show_typeshed_stats: true,
        }
    }

    pub fn with_typeshed_stats(mut self, show: bool) -> Self {
        self.show_typeshed_stats = show;
        self
    }

    pub fn report(&self, reports: &[PackageReport]) {
        for report in reports {
            print!("{}", self.render(report));
        }
    }

    pub fn render(&self, report: &PackageReport) -> String {
        let data = &report.coverage_data;
        let mut lines = vec![format!(
            "Coverage Report for {}:",
            StructureColors::package_name(&report.package)
        )];

        if let Some(rank) = report.download_ranking {
            lines.push(format!("{} {}", StructureColors::label("Download rank:"), rank));
        }
        let fields = [
            ("Has stubs package:", CoverageColors::flag(report.has_stubs_package)),
            ("Has typeshed stubs:", CoverageColors::flag(report.has_type_shed)),
            ("Has py.typed file:", CoverageColors::flag(report.has_py_typed_file)),
            ("Parameter Type Coverage:", CoverageColors::colored(data.parameter_coverage)),
            ("Return Type Coverage:", CoverageColors::colored(data.return_type_coverage)),
            (
                "Parameter Type Coverage With Stubs:",
                CoverageColors::colored(data.parameter_coverage_with_stubs),
            ),
            (
                "Return Type Coverage With Stubs:",
                CoverageColors::colored(data.return_type_coverage_with_stubs),
            ),
            (
                "Parameter Type Coverage With Tests:",
                CoverageColors::colored(data.param_coverage_with_tests),
            ),
            (
                "Return Type Coverage With Tests:",
                CoverageColors::colored(data.return_coverage_with_tests),
            ),
        ];
        for (label, value) in fields {
            lines.push(format!("{} {}", StructureColors::label(label), value));
        }
        lines.push(format!(
            "{} {}  {} {}  {} {}",
            StructureColors::label("Skipped files:"),
            data.skipped_files,
            StructureColors::label("Surface area:"),
            report.surface_area,
            StructureColors::label("hasattr/getattr calls:"),
            report.has_attr_calls + report.get_attr_with_default_calls
        ));

        if self.show_typeshed_stats {
            if let Some(record) = &report.typeshed_data {
                lines.extend(typeshed_stats_lines(record));
            }
        }

        lines.push(BoxChars::light_line(40));
        lines.push(String::new());
        lines.join("\n")
    }
}

fn typeshed_stats_lines(record: &CompletenessRecord) -> Vec<String> {
    vec![
        String::new(),
        StructureColors::heading("Typeshed Coverage Stats:").to_string(),
        format!("Completeness Level: {}", record.completeness_level),
        format!("Annotated Parameters: {}", record.annotated_parameters),
        format!("Unannotated Parameters: {}", record.unannotated_parameters),
        format!("Parameter Coverage: {}", record.parameter_coverage),
        format!("Annotated Returns: {}", record.annotated_returns),
        format!("Unannotated Returns: {}", record.unannotated_returns),
        format!("Return Coverage: {}", record.return_coverage),
        format!("Stubtest Strictness: {}", record.stubtest_strictness),
        format!("Stubtest Platforms: {}", record.stubtest_platforms),
    ]
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
