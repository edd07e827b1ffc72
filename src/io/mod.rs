//! File collaborators around the core: CSV ingestion, matrix export and the
//! saved-filter store.

mod export;
mod ingest;
mod store;

use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
pub use export::{chunk_file_name, write_chunks, write_matrix_csv, write_matrix_file};
pub use ingest::{normalize_column_name, read_csv, read_csv_from};
pub use store::{read_filter, FilterStore};
use thiserror::Error;

use crate::{filter::FilterError, option::MatrixOption, session::Session, table::RecordTable};

/// Failure while reading or writing files.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV decoding or encoding failure.
    #[error("csv error: {0}")]
    Arrow(#[from] ArrowError),
    /// Saved filter is not valid JSON for a filter expression.
    #[error("filter file error: {0}")]
    Json(#[from] serde_json::Error),
    /// The CSV input has no header row or only blank column names.
    #[error("csv input has no columns")]
    EmptyHeader,
    /// Two headers normalize to the same column name.
    #[error("duplicate column after header normalization: {0}")]
    DuplicateColumn(String),
    /// No saved filter with that name.
    #[error("saved filter not found: {}", .0.display())]
    FilterNotFound(PathBuf),
    /// The loaded filter does not resolve against the loaded table.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Loads the observation CSV at `input` and starts a session on it.
///
/// The session filter comes from `filter` when given, otherwise from the
/// configured default filter if one is saved.
///
/// # Errors
/// Ingestion errors, filter file errors, and [`IoError::Filter`] when the
/// filter names a column the table lacks or carries a malformed pattern.
pub fn open_session(
    input: &Path,
    filter: Option<&Path>,
    option: MatrixOption,
) -> Result<(RecordTable, Session), IoError> {
    let table = read_csv(input)?;
    let expr = match filter {
        Some(path) => Some(read_filter(path)?),
        None => FilterStore::from_option(&option).load_default(&option),
    };
    let mut session = Session::new(option);
    if let Some(expr) = expr {
        session.replace_filter(expr, &table)?;
    }
    Ok((table, session))
}
