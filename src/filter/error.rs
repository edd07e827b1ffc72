use arrow::error::ArrowError;
use thiserror::Error;

/// Failure while resolving or evaluating a filter expression.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A predicate names a column the table does not have.
    #[error("Unknown filter field: {0}")]
    FieldNotFound(String),
    /// A pattern predicate carries a malformed regular expression.
    #[error("Invalid pattern {pattern:?} for field '{field}': {source}")]
    InvalidPattern {
        /// Column the predicate targets.
        field: String,
        /// Pattern text as supplied.
        pattern: String,
        /// Compiler diagnostic.
        #[source]
        source: regex::Error,
    },
    /// Arrow kernel failure while building or combining masks.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}
