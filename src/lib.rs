//! pytypecov - static type-annotation coverage for Python packages
//!
//! Measures how much of a package's function surface carries type
//! annotations, without importing or running any of its code.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **Discovery** - Find the `.py` and `.pyi` files of a package
//! 2. **Extraction** - Parse each file with tree-sitter and collect function
//!    declarations with their annotation counts
//! 3. **Aggregation** - Merge declarations by fully-qualified name, stubs
//!    taking precedence, and sum the counts
//! 4. **Package analysis** - Coverage with and without tests, with external
//!    stubs merged in, and typeshed-stats side data
//! 5. **Reporting** - Terminal, summary, JSON and HTML output

pub mod analysis;
pub mod config;
pub mod coverage;
pub mod dataset;
pub mod discovery;
pub mod error;
pub mod parser;
pub mod report;
pub mod stubs;

pub use analysis::{BatchRunner, CoverageData, PackageAnalyzer, PackageReport, RankedPackage};
pub use config::Config;
pub use coverage::{Coverage, CoverageAggregator, CoverageSummary, PartitionedCoverage};
pub use dataset::{CompletenessDataset, CompletenessRecord};
pub use discovery::{FileFinder, LocalPackageSource, PackageSource, SourceUnit, UnitKind};
pub use error::{Error, ExtractError};
pub use parser::{Declaration, Parser, PythonParser};
pub use report::{ReportFormat, Reporter};
pub use stubs::{merge_with_stubs, StubLocator, StubPackageIndex, TypeshedLocator};
