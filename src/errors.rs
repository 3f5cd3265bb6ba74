//! Error types for qorex.
//!
//! Only malformed *configuration* (and derivations that cannot be evaluated
//! against the loaded data) is fatal. Data-level anomalies such as missing
//! cells, text where a number was expected, or a zero base value never surface
//! here: the comparison engine degrades them to blank or undecorated cells.
//!
//! # Categories
//!
//! - [`ConfigError`]: malformed or duplicate declarations, unreadable config files
//! - [`DerivationError`]: a derived metric cannot be computed for some record
//! - [`DataError`]: the CSV data source cannot be read or is ragged
//! - [`QorexError`]: umbrella type for callers that load everything in one go

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or validating a metric configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The required top-level `groups` value is absent.
    #[error("config does not define a `groups` list")]
    MissingGroups,

    #[error("config declares no groups")]
    NoGroups,

    #[error("group #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("group `{group}` declares no metrics")]
    EmptyGroup { group: String },

    #[error("group `{group}` declares a metric with an empty name")]
    EmptyMetricName { group: String },

    #[error("group `{group}` declares metric `{metric}` more than once")]
    DuplicateMetric { group: String, metric: String },

    #[error("metric `{metric}` uses unknown derivation function `{function}`")]
    UnknownDerivation { metric: String, function: String },
}

/// Errors raised while computing a derived metric for a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DerivationError {
    #[error("derived metric `{metric}` depends on field `{field}`, which is missing (row {row})")]
    MissingField {
        metric: String,
        field: String,
        row: usize,
    },

    #[error("derived metric `{metric}` expects a number in field `{field}`, found `{value}` (row {row})")]
    NonNumeric {
        metric: String,
        field: String,
        value: String,
        row: usize,
    },

    #[error("derived metric `{metric}` could not be computed: {message} (row {row})")]
    InvalidValue {
        metric: String,
        message: String,
        row: usize,
    },
}

impl DerivationError {
    /// Name of the derived metric that failed.
    pub fn metric(&self) -> &str {
        match self {
            Self::MissingField { metric, .. }
            | Self::NonNumeric { metric, .. }
            | Self::InvalidValue { metric, .. } => metric,
        }
    }

    /// Re-attribute the error to the given dataset row.
    pub(crate) fn at_row(mut self, index: usize) -> Self {
        match &mut self {
            Self::MissingField { row, .. }
            | Self::NonNumeric { row, .. }
            | Self::InvalidValue { row, .. } => *row = index,
        }
        self
    }
}

/// Errors raised by the tabular data source.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read data file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("data has no header row")]
    Empty,

    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: u64,
        found: u64,
    },

    #[error("malformed CSV: {message}")]
    Parse { message: String },
}

/// Umbrella error for the load phase (config, data, enrichment).
#[derive(Debug, Error)]
pub enum QorexError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Data(#[from] DataError),
}

pub type Result<T, E = QorexError> = std::result::Result<T, E>;
