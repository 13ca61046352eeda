//! External stub sources
//!
//! Two kinds of stubs can describe a package from the outside: the
//! third-party stubs bundled in typeshed (`stubs/<package>/`) and separately
//! published `<package>-stubs` distributions.

use crate::discovery::{FileFinder, SourceUnit};
use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Finds stub units for a package in some external stub collection
pub trait StubLocator: Sync {
    /// Stub units for `package`, or `None` when the collection has none
    fn locate(&self, package: &str) -> Option<Vec<SourceUnit>>;

    fn has_stubs(&self, package: &str) -> bool {
        self.locate(package).is_some()
    }
}

/// Locates stubs in a local typeshed checkout
#[derive(Debug, Clone)]
pub struct TypeshedLocator {
    root: PathBuf,
    finder: FileFinder,
}

impl TypeshedLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            finder: FileFinder::new(),
        }
    }

    fn stubs_dir(&self, package: &str) -> PathBuf {
        self.root.join("stubs").join(package)
    }
}

impl StubLocator for TypeshedLocator {
    fn locate(&self, package: &str) -> Option<Vec<SourceUnit>> {
        let dir = self.stubs_dir(package);
        if !dir.is_dir() {
            return None;
        }
        let units = self
            .finder
            .find_files(&dir)
            .units
            .into_iter()
            .filter(|u| u.kind.is_stub())
            .collect();
        Some(units)
    }

    fn has_stubs(&self, package: &str) -> bool {
        self.stubs_dir(package).is_dir()
    }
}

/// Stub locator used when no typeshed checkout is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStubs;

impl StubLocator for NoStubs {
    fn locate(&self, _package: &str) -> Option<Vec<SourceUnit>> {
        None
    }
}

/// Combine a package's own units with external stubs.
///
/// Every package unit is kept. An external stub is added unless the package
/// already ships a `.pyi` with the same file name; the package's own stub
/// takes priority over the external one.
pub fn merge_with_stubs(package_units: &[SourceUnit], stubs: &[SourceUnit]) -> Vec<SourceUnit> {
    let shipped: HashSet<&str> = package_units
        .iter()
        .filter(|u| u.kind.is_stub())
        .filter_map(|u| u.file_name())
        .collect();

    let mut merged = package_units.to_vec();
    merged.extend(
        stubs
            .iter()
            .filter(|s| s.file_name().map_or(true, |name| !shipped.contains(name)))
            .cloned(),
    );
    merged
}

/// Packages known to have a `<package>-stubs` distribution
#[derive(Debug, Clone, Default)]
pub struct StubPackageIndex {
    packages: BTreeSet<String>,
}

impl StubPackageIndex {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a JSON array of package names
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let packages: Vec<String> =
            serde_json::from_str(&content).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(packages))
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    /// Distribution name of the stub package
    pub fn stub_distribution(package: &str) -> String {
        format!("{}-stubs", package)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn paths(units: &[SourceUnit]) -> Vec<String> {
        units
            .iter()
            .map(|u| u.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_merge_prefers_package_stub() {
        let package = vec![
            SourceUnit::new("/path/to/package/__init__.py"),
            SourceUnit::new("/path/to/package/module.py"),
            SourceUnit::new("/path/to/package/module.pyi"),
        ];
        let stubs = vec![
            SourceUnit::new("/typeshed/stubs/mock_package/module.pyi"),
            SourceUnit::new("/typeshed/stubs/mock_package/another_module.pyi"),
        ];

        let merged = paths(&merge_with_stubs(&package, &stubs));

        assert!(merged.contains(&"/path/to/package/module.pyi".to_string()));
        assert!(merged.contains(&"/path/to/package/module.py".to_string()));
        assert!(merged.contains(&"/typeshed/stubs/mock_package/another_module.pyi".to_string()));
        assert!(!merged.contains(&"/typeshed/stubs/mock_package/module.pyi".to_string()));
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_typeshed_locator() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("stubs").join("mock_package");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("__init__.pyi"), "# mock init file").unwrap();
        fs::write(pkg.join("module.pyi"), "# mock module file").unwrap();
        fs::write(pkg.join("METADATA.toml"), "version = \"1.0\"").unwrap();

        let locator = TypeshedLocator::new(dir.path());

        assert!(locator.has_stubs("mock_package"));
        assert!(!locator.has_stubs("other_package"));
        assert_eq!(locator.locate("mock_package").unwrap().len(), 2);
        assert!(locator.locate("other_package").is_none());
    }

    #[test]
    fn test_stub_package_index_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stub_packages.json");
        fs::write(&path, r#"["django", "pandas"]"#).unwrap();

        let index = StubPackageIndex::from_file(&path).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.contains("django"));
        assert!(!index.contains("requests"));
        assert_eq!(StubPackageIndex::stub_distribution("django"), "django-stubs");
    }
}
