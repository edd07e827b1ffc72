use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use arrow::csv::WriterBuilder;

use super::IoError;
use crate::{
    matrix::{page::chunk, PresenceMatrix},
    observability::log_info,
};

/// File name of the 1-based chunk `number`.
#[must_use]
pub fn chunk_file_name(number: usize) -> String {
    format!("matrix_chunk_{number}.csv")
}

/// Writes `matrix` as CSV: the row-identity column first, then one `Yes`/`No`
/// column per column-identity.
///
/// # Errors
/// Encoding and write errors.
pub fn write_matrix_csv<W: Write>(matrix: &PresenceMatrix, writer: W) -> Result<(), IoError> {
    let batch = matrix.to_record_batch()?;
    let mut writer = WriterBuilder::new().with_header(true).build(writer);
    writer.write(&batch)?;
    Ok(())
}

/// Writes `matrix` to `path`, replacing any existing file.
///
/// # Errors
/// Encoding and filesystem errors.
pub fn write_matrix_file(matrix: &PresenceMatrix, path: impl AsRef<Path>) -> Result<(), IoError> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_matrix_csv(matrix, &mut out)?;
    out.flush()?;
    log_info!(
        component = "export",
        event = "matrix_written",
        path = %path.display(),
        rows = matrix.row_count(),
        columns = matrix.column_count(),
    );
    Ok(())
}

/// Writes one file per chunk of `chunk_size` columns into `dir`, creating it
/// when needed. Returns the written paths in chunk order.
///
/// # Errors
/// Encoding and filesystem errors.
pub fn write_chunks(
    matrix: &PresenceMatrix,
    dir: impl AsRef<Path>,
    chunk_size: NonZeroUsize,
) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (index, piece) in chunk(matrix, chunk_size).enumerate() {
        let path = dir.join(chunk_file_name(index + 1));
        write_matrix_file(&piece, &path)?;
        written.push(path);
    }
    log_info!(
        component = "export",
        event = "chunks_written",
        dir = %dir.display(),
        chunks = written.len(),
        chunk_size = chunk_size.get(),
    );
    Ok(written)
}
