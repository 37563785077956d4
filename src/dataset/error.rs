//! Dataset error types
//!
//! Defines all errors that can occur while loading or validating the static
//! dashboard assets.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the dataset layer
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Asset file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Asset file is not valid JSON for its expected shape
    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parallel sequences within one record have different lengths
    #[error("Length mismatch in '{field}': expected {expected} values, found {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Metric key is not one of the eleven dashboard metrics
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Summary map key does not exist in the maps table
    #[error("Map not found: {0}")]
    MapNotFound(String),

    /// CSV export failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No record for a county/metric combination
    #[error("No {metric} data for county: {county}")]
    RecordNotFound { county: String, metric: String },
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
