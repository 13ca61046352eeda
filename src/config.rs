//! Run configuration
//!
//! Loaded from TOML or YAML; every path can be overridden on the command line.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names probed, in order, by [`Config::from_default_locations`]
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "pytypecov.toml",
    ".pytypecov.toml",
    ".pytypecov.yml",
    ".pytypecov.yaml",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one extracted source tree per package
    pub sources_dir: PathBuf,

    /// Local typeshed checkout; typeshed stubs are ignored when unset
    pub typeshed_dir: Option<PathBuf>,

    /// JSON array of packages with a `<package>-stubs` distribution
    pub stub_packages_file: Option<PathBuf>,

    pub top_packages_file: PathBuf,

    /// typeshed-stats CSV export
    pub typeshed_stats_file: Option<PathBuf>,

    pub json_report_file: PathBuf,
    pub html_report_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources_dir: PathBuf::from("sources"),
            typeshed_dir: None,
            stub_packages_file: None,
            top_packages_file: PathBuf::from("top-pypi-packages-30-days.min.json"),
            typeshed_stats_file: None,
            json_report_file: PathBuf::from("package_report.json"),
            html_report_file: PathBuf::from("index.html"),
        }
    }
}

impl Config {
    /// Load a config file, choosing the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let invalid = |message: String| Error::ConfigInvalid {
            path: path.to_path_buf(),
            message,
        };

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => {
                serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?
            }
            Some("toml") => toml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
            _ => return Err(invalid("unrecognised file extension".to_string())),
        };

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// First default config file found in `dir`, or the defaults
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        match DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
        {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No config file in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }
}
