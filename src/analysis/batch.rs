use super::{PackageAnalyzer, PackageReport};
use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Largest accepted `top_n`
pub const MAX_TOP_N: usize = 8000;

#[derive(Debug, Deserialize)]
struct TopPackages {
    rows: Vec<TopPackageRow>,
}

#[derive(Debug, Deserialize)]
struct TopPackageRow {
    #[serde(default)]
    project: Option<String>,
    download_count: u64,
}

/// A package with its position in the download ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPackage {
    pub project: String,
    pub download_count: u64,
    /// 1-based
    pub rank: usize,
}

/// Load the top-packages listing and keep the `top_n` most downloaded.
///
/// Ranks are assigned before rows without a project name are dropped, so a
/// nameless row still occupies its rank.
pub fn load_ranked_packages(path: &Path, top_n: usize) -> Result<Vec<RankedPackage>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut listing: TopPackages =
        serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

    listing
        .rows
        .sort_by(|a, b| b.download_count.cmp(&a.download_count));

    Ok(listing
        .rows
        .into_iter()
        .take(top_n)
        .enumerate()
        .filter_map(|(i, row)| {
            let project = row.project.filter(|p| !p.is_empty())?;
            Some(RankedPackage {
                project,
                download_count: row.download_count,
                rank: i + 1,
            })
        })
        .collect())
}

/// Runs the analyzer over a ranked list of packages
pub struct BatchRunner<'a> {
    analyzer: &'a PackageAnalyzer,
    parallel: bool,
    show_progress: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(analyzer: &'a PackageAnalyzer) -> Self {
        Self {
            analyzer,
            parallel: false,
            show_progress: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Show a progress bar in sequential mode
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Analyze every package; reports come back in rank order
    pub fn run(&self, packages: &[RankedPackage]) -> Vec<PackageReport> {
        let mut reports: Vec<PackageReport> = if self.parallel {
            info!("Analyzing {} packages in parallel", packages.len());
            packages
                .par_iter()
                .map(|p| self.analyzer.analyze_ranked(p))
                .collect()
        } else {
            self.run_sequential(packages)
        };

        reports.sort_by_key(|r| r.download_ranking);
        reports
    }

    fn run_sequential(&self, packages: &[RankedPackage]) -> Vec<PackageReport> {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(packages.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            ) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let reports = packages
            .iter()
            .map(|p| {
                pb.set_message(p.project.clone());
                let report = self.analyzer.analyze_ranked(p);
                pb.inc(1);
                report
            })
            .collect();

        pb.finish_with_message("Analysis complete");
        reports
    }
}
