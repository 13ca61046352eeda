use super::{CoverageData, PackageReport, RankedPackage};
use crate::coverage::{CoverageAggregator, CoverageSummary};
use crate::dataset::CompletenessDataset;
use crate::discovery::{PackageFiles, PackageSource, SourceUnit};
use crate::stubs::{merge_with_stubs, NoStubs, StubLocator, StubPackageIndex};
use tracing::{debug, info, warn};

/// Analyzes one package at a time against the configured stub sources
pub struct PackageAnalyzer {
    source: Box<dyn PackageSource>,
    typeshed: Box<dyn StubLocator>,
    stub_packages: StubPackageIndex,
    dataset: CompletenessDataset,
    aggregator: CoverageAggregator,
}

impl PackageAnalyzer {
    pub fn new(source: impl PackageSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            typeshed: Box::new(NoStubs),
            stub_packages: StubPackageIndex::default(),
            dataset: CompletenessDataset::default(),
            aggregator: CoverageAggregator::new(),
        }
    }

    pub fn with_typeshed(mut self, locator: impl StubLocator + 'static) -> Self {
        self.typeshed = Box::new(locator);
        self
    }

    pub fn with_stub_packages(mut self, index: StubPackageIndex) -> Self {
        self.stub_packages = index;
        self
    }

    pub fn with_dataset(mut self, dataset: CompletenessDataset) -> Self {
        self.dataset = dataset;
        self
    }

    /// Analyze a package outside of any download ranking
    pub fn analyze(&self, package: &str) -> PackageReport {
        self.run(package, None, None)
    }

    pub fn analyze_ranked(&self, ranked: &RankedPackage) -> PackageReport {
        self.run(
            &ranked.project,
            Some(ranked.rank),
            Some(ranked.download_count),
        )
    }

    fn run(
        &self,
        package: &str,
        rank: Option<usize>,
        download_count: Option<u64>,
    ) -> PackageReport {
        match rank {
            Some(rank) => info!("Analyzing package: {} rank {}", package, rank),
            None => info!("Analyzing package: {}", package),
        }

        let files = self.fetch(package);
        let mut units = files.units;
        let mut has_py_typed_file = files.has_py_typed;

        let has_stubs_package = self.stub_packages.contains(package);
        if has_stubs_package {
            let stub_distribution = self.fetch(&StubPackageIndex::stub_distribution(package));
            has_py_typed_file |= stub_distribution.has_py_typed;
            units = merge_with_stubs(&units, &stub_distribution.units);
        }

        let partitioned = self.aggregator.aggregate_partitioned(&units);
        let without_tests = &partitioned.without_tests;
        let with_tests = &partitioned.with_tests;

        let has_type_shed = self.typeshed.has_stubs(package);
        let with_stubs = match self.typeshed.locate(package) {
            Some(stubs) => {
                debug!(
                    "Typeshed exists for {}. Including {} stubs in analysis.",
                    package,
                    stubs.len()
                );
                let non_test: Vec<SourceUnit> =
                    units.iter().filter(|u| !u.is_test).cloned().collect();
                self.aggregator.aggregate(&merge_with_stubs(&non_test, &stubs))
            }
            None => without_tests.clone(),
        };

        PackageReport {
            package: package.to_string(),
            download_count,
            download_ranking: rank,
            coverage_data: coverage_data(without_tests, with_tests, &with_stubs),
            has_py_typed_file,
            has_type_shed,
            has_stubs_package,
            surface_area: without_tests.surface_area,
            has_attr_calls: without_tests.hasattr_calls,
            get_attr_with_default_calls: without_tests.getattr_default_calls,
            typeshed_data: self.dataset.get(package).cloned(),
        }
    }

    /// Fetch a package's files; a package that cannot be found is analyzed
    /// as an empty file list.
    fn fetch(&self, package: &str) -> PackageFiles {
        self.source.fetch(package).unwrap_or_else(|e| {
            warn!("{}", e);
            PackageFiles::default()
        })
    }
}

fn coverage_data(
    without_tests: &CoverageSummary,
    with_tests: &CoverageSummary,
    with_stubs: &CoverageSummary,
) -> CoverageData {
    CoverageData {
        parameter_coverage: without_tests.parameter_coverage(),
        return_type_coverage: without_tests.return_coverage(),
        parameter_coverage_with_stubs: with_stubs.parameter_coverage(),
        return_type_coverage_with_stubs: with_stubs.return_coverage(),
        param_coverage_with_tests: with_tests.parameter_coverage(),
        return_coverage_with_tests: with_tests.return_coverage(),
        skipped_files: with_stubs.skipped_units.max(with_tests.skipped_units),
    }
}
