//! typeshed-stats completeness dataset
//!
//! Reads the `stats_as_csv.csv` export published by typeshed-stats. Records
//! are shown next to the computed coverage and never feed into it.

use crate::coverage::Coverage;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One CSV row as published
#[derive(Debug, Deserialize)]
struct Row {
    package_name: String,
    completeness_level: String,
    annotated_parameters: u64,
    unannotated_parameters: u64,
    annotated_returns: u64,
    unannotated_returns: u64,
    stubtest_strictness: String,
    stubtest_platforms: String,
}

/// Completeness figures for one typeshed stub distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessRecord {
    pub completeness_level: String,
    pub annotated_parameters: u64,
    pub unannotated_parameters: u64,
    #[serde(rename = "% param")]
    pub parameter_coverage: Coverage,
    pub annotated_returns: u64,
    pub unannotated_returns: u64,
    #[serde(rename = "% return")]
    pub return_coverage: Coverage,
    pub stubtest_strictness: String,
    pub stubtest_platforms: String,
}

impl From<Row> for CompletenessRecord {
    fn from(row: Row) -> Self {
        Self {
            parameter_coverage: split_coverage(row.annotated_parameters, row.unannotated_parameters),
            return_coverage: split_coverage(row.annotated_returns, row.unannotated_returns),
            completeness_level: row.completeness_level,
            annotated_parameters: row.annotated_parameters,
            unannotated_parameters: row.unannotated_parameters,
            annotated_returns: row.annotated_returns,
            unannotated_returns: row.unannotated_returns,
            stubtest_strictness: row.stubtest_strictness,
            stubtest_platforms: row.stubtest_platforms,
        }
    }
}

fn split_coverage(annotated: u64, unannotated: u64) -> Coverage {
    Coverage::from_counts(annotated as usize, (annotated + unannotated) as usize)
}

/// Completeness records keyed by lower-cased package name
#[derive(Debug, Clone, Default)]
pub struct CompletenessDataset {
    records: HashMap<String, CompletenessRecord>,
}

impl CompletenessDataset {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file).map_err(|source| Error::Dataset {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = HashMap::new();
        for row in csv_reader.deserialize::<Row>() {
            let row = row?;
            let key = row.package_name.trim().to_lowercase();
            records.insert(key, CompletenessRecord::from(row));
        }

        debug!("Loaded {} typeshed-stats records", records.len());
        Ok(Self { records })
    }

    /// Look up a package, ignoring case
    pub fn get(&self, package: &str) -> Option<&CompletenessRecord> {
        self.records.get(&package.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
