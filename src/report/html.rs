//! HTML table report with a colour gradient per coverage cell

use crate::analysis::PackageReport;
use crate::coverage::Coverage;
use crate::error::Error;
use html_escape::encode_text;
use miette::Result;
use std::path::PathBuf;

const TEMPLATE: &str = include_str!("templates/report.html");
const ROWS_PLACEHOLDER: &str = "{{ROWS}}";

pub struct HtmlReporter {
    output_path: PathBuf,
}

impl HtmlReporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn report(&self, reports: &[PackageReport]) -> Result<()> {
        std::fs::write(&self.output_path, render(reports)).map_err(|source| Error::ReportWrite {
            path: self.output_path.clone(),
            source,
        })?;
        Ok(())
    }
}

pub fn render(reports: &[PackageReport]) -> String {
    let mut rows = String::new();
    for report in reports {
        render_row(&mut rows, report);
    }
    TEMPLATE.replace(ROWS_PLACEHOLDER, &rows)
}

fn render_row(out: &mut String, report: &PackageReport) {
    let data = &report.coverage_data;
    let optional = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());
    let (typeshed_param, typeshed_return, completeness, strictness) = match &report.typeshed_data {
        Some(record) => (
            record.parameter_coverage,
            record.return_coverage,
            record.completeness_level.as_str(),
            record.stubtest_strictness.as_str(),
        ),
        None => (Coverage::NotApplicable, Coverage::NotApplicable, "N/A", "N/A"),
    };

    let cells = [
        format!("<td>{}</td>", optional(report.download_ranking.map(|r| r.to_string()))),
        format!("<td>{}</td>", encode_text(&report.package)),
        format!("<td>{}</td>", optional(report.download_count.map(|c| c.to_string()))),
        boolean_cell(report.has_type_shed),
        boolean_cell(report.has_stubs_package),
        coverage_cell(data.parameter_coverage),
        coverage_cell(data.return_type_coverage),
        coverage_cell(data.parameter_coverage_with_stubs),
        coverage_cell(data.return_type_coverage_with_stubs),
        coverage_cell(typeshed_param),
        coverage_cell(typeshed_return),
        format!("<td>{}</td>", encode_text(completeness)),
        format!("<td>{}</td>", encode_text(strictness)),
    ];

    out.push_str("        <tr>\n");
    for cell in cells {
        out.push_str("            ");
        out.push_str(&cell);
        out.push('\n');
    }
    out.push_str("        </tr>\n");
}

/// Background colour running red (0%) through yellow (50%) to green (100%)
pub fn gradient_color(percentage: f64) -> String {
    let percentage = percentage.clamp(0.0, 100.0);
    let (red, green) = if percentage < 50.0 {
        (255, (255.0 * (percentage / 50.0)) as u8)
    } else {
        ((255.0 * ((100.0 - percentage) / 50.0)) as u8, 255)
    };
    let blue = 200;
    format!("rgb({},{},{})", red, green, blue)
}

fn coverage_cell(coverage: Coverage) -> String {
    match coverage {
        Coverage::Percent(p) => format!(
            "<td class=\"coverage-cell\" style=\"background-color: {};\">{:.2}%</td>",
            gradient_color(p),
            p
        ),
        Coverage::NotApplicable => "<td class=\"coverage-cell\">N/A</td>".to_string(),
    }
}

fn boolean_cell(value: bool) -> String {
    let (color, text) = if value { ("green", "Yes") } else { ("red", "No") };
    format!("<td style=\"background-color: {};\">{}</td>", color, text)
}
