//! Error taxonomy for barcode loading, metric computation, chart rendering
//! and metrics logging.
//!
//! Nothing in the library recovers locally: every failure is surfaced to the
//! caller as one of these variants.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the library.
#[derive(Debug, Error)]
pub enum TdaError {
    /// A barcode file or metrics log path does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Malformed JSON, or JSON whose shape is not a barcode document.
    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Division by zero or log of zero in a metric formula.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Metrics log top-level value has an unexpected type.
    #[error("schema error: {0}")]
    Schema(String),

    /// A barcode set has no entry for the requested homology dimension.
    #[error("homology dimension '{dimension}' missing from barcode set")]
    MissingDimension { dimension: String },

    /// A metric was requested for a series with no epochs.
    #[error("layer series contains no epochs")]
    EmptySeries,

    /// A data amount has fewer layers than the requested index.
    #[error("layer {index} not present for data amount {amount}")]
    MissingLayer { index: usize, amount: u64 },

    /// A layer is missing from at least one epoch.
    #[error("layer '{layer}' is missing from one or more epochs")]
    RaggedLayers { layer: String },

    /// Chart inputs disagree in length or index out of range.
    #[error("invalid chart input: {0}")]
    InvalidChart(String),

    /// Backend failure while drawing a figure.
    #[error("render error: {0}")]
    Render(String),

    /// Invalid analysis configuration.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TdaError {
    /// Map an I/O error on `path` to `NotFound` when the file is absent.
    pub(crate) fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = TdaError::from_io("run_DataAmount1000/barcodes/barcode_data.json", io);
        assert!(matches!(err, TdaError::NotFound { .. }));
        assert!(err.to_string().contains("run_DataAmount1000"));
    }

    #[test]
    fn test_other_io_kept_as_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TdaError::from_io("x.json", io);
        assert!(matches!(err, TdaError::Io(_)));
    }

    #[test]
    fn test_display_arithmetic() {
        let err = TdaError::Arithmetic("log2(1) is zero".into());
        assert_eq!(err.to_string(), "arithmetic error: log2(1) is zero");
    }
}
