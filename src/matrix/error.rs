use arrow::error::ArrowError;

use crate::filter::FilterError;

/// Error returned while building or rendering a presence matrix.
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    /// The table lacks a column needed for an axis.
    #[error("Missing column: {0}")]
    MissingColumn(String),
    /// Filter resolution or evaluation failed.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),
    /// Arrow kernel failure.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}
