//! Error types for data operations.

use crate::feed::{FeedKind, Field};
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that abort an ingestion run.
///
/// Problems with optional fields never surface here; they are reported as
/// [`SkippedRow`](crate::feed::SkippedRow)s in the load report instead.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Period string could not be parsed
    #[error("Invalid period '{value}': {reason}")]
    InvalidPeriod {
        /// Raw period text
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Row without a company code
    #[error("{feed} line {line}: missing company code")]
    MissingCode {
        /// Feed being loaded
        feed: FeedKind,
        /// 1-based line number in the source
        line: u64,
    },

    /// Structurally required field was not disclosed or not parsable
    #[error("{feed} line {line}: required field {field} has invalid value '{value}'")]
    RequiredField {
        /// Feed being loaded
        feed: FeedKind,
        /// 1-based line number in the source
        line: u64,
        /// Offending field
        field: Field,
        /// Raw cell contents
        value: String,
    },

    /// Row is shorter than the column layout requires
    #[error("{feed} line {line}: no column {column} for {field}")]
    MissingColumn {
        /// Feed being loaded
        feed: FeedKind,
        /// 1-based line number in the source
        line: u64,
        /// Field the column was mapped to
        field: Field,
        /// 0-based column index from the layout
        column: usize,
    },
}
