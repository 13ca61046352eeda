use crate::discovery::{is_test_path, SourceUnit, UnitKind};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Marker file a package ships to declare it is typed (PEP 561)
pub const PY_TYPED_MARKER: &str = "py.typed";

/// Python files found in one package tree
#[derive(Debug, Clone, Default)]
pub struct PackageFiles {
    pub units: Vec<SourceUnit>,
    pub has_py_typed: bool,
}

/// Supplies the local source files of a package
///
/// Retrieval (downloading an sdist, unpacking it) happens behind this
/// trait; the analyzer only ever sees local paths.
pub trait PackageSource: Sync {
    fn fetch(&self, package: &str) -> Result<PackageFiles>;
}

/// Walks a directory for `.py` and `.pyi` files
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFinder;

impl FileFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find all Python sources under `root`, sorted by path so repeated
    /// runs see the same unit order.
    pub fn find_files(&self, root: &Path) -> PackageFiles {
        let mut units = Vec::new();
        let mut has_py_typed = false;

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if entry.file_name() == PY_TYPED_MARKER {
                has_py_typed = true;
                continue;
            }
            if UnitKind::from_path(path).is_some() {
                // Only components below the package root decide test ownership
                let mut unit = SourceUnit::new(path);
                unit.is_test = is_test_path(path.strip_prefix(root).unwrap_or(path));
                units.push(unit);
            }
        }

        units.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(
            "Found {} Python files under {} (py.typed: {})",
            units.len(),
            root.display(),
            has_py_typed
        );

        PackageFiles {
            units,
            has_py_typed,
        }
    }
}

/// Reads packages that were already extracted to `<root>/<package>/`
#[derive(Debug, Clone)]
pub struct LocalPackageSource {
    root: PathBuf,
    finder: FileFinder,
}

impl LocalPackageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            finder: FileFinder::new(),
        }
    }

    fn package_dir(&self, package: &str) -> Option<PathBuf> {
        // sdists normalise '-' and '_' inconsistently, try both spellings
        let candidates = [
            package.to_string(),
            package.replace('-', "_"),
            package.replace('_', "-"),
        ];
        candidates
            .iter()
            .map(|name| self.root.join(name))
            .find(|dir| dir.is_dir())
    }
}

impl PackageSource for LocalPackageSource {
    fn fetch(&self, package: &str) -> Result<PackageFiles> {
        let dir = self
            .package_dir(package)
            .ok_or_else(|| Error::PackageNotFound {
                package: package.to_string(),
                root: self.root.clone(),
            })?;
        Ok(self.finder.find_files(&dir))
    }
}
