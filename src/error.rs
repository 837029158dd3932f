//! Error types for subspace-plots
//!
//! Load failures (missing folders, unreadable files, malformed records),
//! records lacking an array a chart needs and records whose contents do not
//! fit the requested slice are recoverable per result folder. Unknown models,
//! missing reference data and drawing failures abort the current chart.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// subspace-plots error types
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record or overlay file could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// No persisted record in the result folder
    #[error("path {} does not exist", .0.display())]
    RecordNotFound(PathBuf),

    /// A quantity needs an array the record does not carry
    #[error("record has no `{0}` array")]
    MissingArray(&'static str),

    /// Array axes disagree with the rest of the record
    #[error("shape mismatch in `{array}`: expected {expected}, found {found:?}")]
    ShapeMismatch {
        /// Record key of the offending array
        array: &'static str,
        /// Human-readable description of the expected layout
        expected: String,
        /// Actual shape
        found: Vec<usize>,
    },

    /// Grid or data index past the end of an axis
    #[error("index {index} out of range for axis of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Axis extent
        len: usize,
    },

    /// QOI tag not in the closed set
    #[error("unknown quantity of interest `{0}`")]
    UnknownQoi(String),

    /// Model name not in the objective function catalog
    #[error("unknown model `{0}`")]
    UnknownModel(String),

    /// Reference data needed for an error metric is not known
    #[error("{what} unknown for model `{model}`")]
    MissingReference {
        /// Model name
        model: String,
        /// Which reference quantity is missing
        what: &'static str,
    },

    /// Invalid argument or record content
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Drawing backend failure
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the driver should skip the current result folder and carry on.
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::Json(_)
                | Self::RecordNotFound(_)
                | Self::MissingArray(_)
                | Self::ShapeMismatch { .. }
                | Self::IndexOutOfRange { .. }
                | Self::InvalidInput(_)
        )
    }

    pub(crate) fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }
}
