use crate::error::ExtractError;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Whether a unit carries executable code or only signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// `.py` file
    Implementation,
    /// `.pyi` interface stub
    Stub,
}

impl UnitKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("py") => Some(UnitKind::Implementation),
            Some("pyi") => Some(UnitKind::Stub),
            _ => None,
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, UnitKind::Stub)
    }
}

/// One Python source file taking part in an aggregation
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub kind: UnitKind,
    pub is_test: bool,
    contents: Option<String>,
}

impl SourceUnit {
    /// Unit backed by a file on disk. Anything that is not `.pyi` is
    /// treated as an implementation file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = UnitKind::from_path(&path).unwrap_or(UnitKind::Implementation);
        let is_test = is_test_path(&path);
        Self {
            path,
            kind,
            is_test,
            contents: None,
        }
    }

    /// Unit whose text is already in memory
    pub fn from_source(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let mut unit = Self::new(path);
        unit.contents = Some(contents.into());
        unit
    }

    /// Module name used in fully-qualified names: the file name without
    /// its extension.
    pub fn module_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name including extension, used to match package stubs against
    /// external ones.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Read the unit's text. Bytes that are not valid UTF-8 make the unit
    /// unreadable; a leading byte-order mark is dropped.
    pub fn read(&self) -> Result<Cow<'_, str>, ExtractError> {
        if let Some(contents) = &self.contents {
            return Ok(Cow::Borrowed(strip_bom(contents)));
        }

        let bytes =
            std::fs::read(&self.path).map_err(|e| ExtractError::unreadable(&self.path, e))?;
        let text =
            String::from_utf8(bytes).map_err(|e| ExtractError::unreadable(&self.path, e))?;

        Ok(Cow::Owned(strip_bom(&text).to_string()))
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// A path is test code when any component, with underscores removed,
/// is `test` or `tests`. `\` separators are normalised first so Windows
/// style paths classify the same way.
pub fn is_test_path(path: &Path) -> bool {
    let normalized = path.to_string_lossy().replace('\\', "/");
    normalized
        .split('/')
        .map(|part| part.replace('_', ""))
        .any(|part| part == "test" || part == "tests")
}
