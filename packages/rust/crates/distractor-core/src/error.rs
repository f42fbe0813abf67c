//! Error types for loading the input dataset.
//!
//! Library code uses `thiserror` enums; the store append itself only ever
//! surfaces [`std::io::Error`].

use thiserror::Error;

/// Failure while loading an input dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// One or more required columns are absent after header normalization.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The file could not be parsed as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
