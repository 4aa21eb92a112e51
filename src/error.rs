//! Error types for bench-aggregate
//!
//! Every failure is fatal for the run: nothing is retried and no partial
//! report is produced. Messages name the file and field involved so the
//! offending benchmark output can be found directly.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// bench-aggregate error types
#[derive(Error, Debug)]
pub enum Error {
    /// Results directory does not exist (benchmark has not been run yet)
    #[error("{} directory not found!", path.display())]
    ResultsDirMissing {
        /// Directory that was looked up
        path: PathBuf,
    },

    /// A record lacks a field the variant requires
    #[error("Missing field '{field}' in {source_name}")]
    MissingField {
        /// Field name that was looked up
        field: String,
        /// File and line the record came from
        source_name: String,
    },

    /// A measurement field does not hold a number
    #[error("Invalid number '{value}' for field '{field}' in {source_name}")]
    InvalidNumber {
        /// Field name
        field: String,
        /// Raw text found in the file
        value: String,
        /// File and line the record came from
        source_name: String,
    },

    /// A series is absent or empty when it is about to be formatted
    #[error("No data for series '{series}' in bucket {bucket}")]
    NoData {
        /// Bucket key, rendered
        bucket: String,
        /// Series name
        series: String,
    },

    /// Series that must be index-aligned have different lengths
    #[error("Series length mismatch in bucket {bucket}: cannot sum per-record totals")]
    SeriesLengthMismatch {
        /// Bucket key, rendered
        bucket: String,
    },

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Result file is not well-formed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
