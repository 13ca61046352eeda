use crate::analysis::{serialize_reports, PackageReport};
use crate::error::Error;
use miette::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes the reports as one JSON object keyed by package name
pub struct JsonReporter {
    output_path: PathBuf,
}

impl JsonReporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn report(&self, reports: &[PackageReport]) -> Result<()> {
        let file = File::create(&self.output_path).map_err(|source| self.write_error(source))?;
        let mut writer = BufWriter::new(file);
        render(reports, &mut writer).map_err(|source| self.write_error(source))?;
        writer.flush().map_err(|source| self.write_error(source))?;
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> miette::Report {
        Error::ReportWrite {
            path: self.output_path.clone(),
            source,
        }
        .into()
    }
}

/// Pretty-print with four-space indentation, packages in input order
pub fn render<W: Write>(reports: &[PackageReport], writer: W) -> std::io::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    Reports(reports).serialize(&mut serializer)?;
    Ok(())
}

struct Reports<'a>(&'a [PackageReport]);

impl Serialize for Reports<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_reports(self.0, serializer)
    }
}
