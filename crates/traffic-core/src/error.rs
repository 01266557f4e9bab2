use std::path::PathBuf;
use thiserror::Error;

/// All unrecoverable errors produced by the traffic tool.
///
/// Record-level problems never show up here; they are tallied as
/// [`Rejection`](crate::normalizer::Rejection)s and the record is skipped.
#[derive(Error, Debug)]
pub enum TrafficError {
    /// The input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input document is not valid JSON.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The input document parsed, but its top level is not an array.
    #[error("Expected a JSON array of records, found {0}")]
    NotAnArray(String),

    /// The chart backend failed to draw or encode the image.
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the traffic crates.
pub type Result<T> = std::result::Result<T, TrafficError>;
