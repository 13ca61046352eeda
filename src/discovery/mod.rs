//! Source discovery
//!
//! Turns a package directory into the list of source units the aggregator
//! consumes, and classifies each unit as implementation or stub, test or
//! production code.

mod finder;
mod source;

pub use finder::{FileFinder, LocalPackageSource, PackageFiles, PackageSource, PY_TYPED_MARKER};
pub use source::{is_test_path, SourceUnit, UnitKind};
