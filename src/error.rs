//! Error types
//!
//! `ExtractError` is recovered per source unit and never escapes the
//! aggregator. `Error` covers everything around it: configuration, package
//! lookup, the completeness dataset and report output.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single source unit contributed no declarations
#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    /// The file could not be read or is not valid UTF-8 text
    #[error("cannot read {path} as text: {reason}")]
    #[diagnostic(code(pytypecov::unreadable_unit))]
    Unreadable { path: PathBuf, reason: String },

    /// The text is not syntactically valid Python
    #[error("syntax error in {path} at line {line}")]
    #[diagnostic(code(pytypecov::parse_failure))]
    Syntax { path: PathBuf, line: usize },

    /// The grammar could not be loaded into the parser
    #[error("failed to initialise the Python grammar: {0}")]
    #[diagnostic(code(pytypecov::grammar))]
    Grammar(String),
}

impl ExtractError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Unreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors surfaced to the caller of the package-level operations
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read config file {path}")]
    #[diagnostic(
        code(pytypecov::config::io),
        help("check that the file exists and is readable")
    )]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(pytypecov::config::invalid),
        help("config files are TOML (.toml) or YAML (.yml, .yaml)")
    )]
    ConfigInvalid { path: PathBuf, message: String },

    #[error("no sources found for package '{package}' under {root}")]
    #[diagnostic(
        code(pytypecov::package::not_found),
        help("extract the package's source distribution into <sources>/<package>/")
    )]
    PackageNotFound { package: String, root: PathBuf },

    #[error("failed to read {path}")]
    #[diagnostic(code(pytypecov::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}")]
    #[diagnostic(code(pytypecov::json))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid typeshed-stats CSV {path}")]
    #[diagnostic(
        code(pytypecov::dataset),
        help("expected the stats_as_csv.csv export from typeshed-stats")
    )]
    Dataset {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write report {path}")]
    #[diagnostic(code(pytypecov::report))]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
