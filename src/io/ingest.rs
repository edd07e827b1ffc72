use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
    sync::Arc,
};

use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema},
};

use super::IoError;
use crate::{
    observability::{log_info, log_warn},
    table::RecordTable,
};

/// Strips whitespace, zero-width spaces and byte-order marks from a header.
#[must_use]
pub fn normalize_column_name(name: &str) -> String {
    name.replace(['\u{200b}', '\u{feff}'], "").trim().to_string()
}

/// Reads the CSV file at `path`. See [`read_csv_from`].
///
/// # Errors
/// Filesystem and decoding errors.
pub fn read_csv(path: impl AsRef<Path>) -> Result<RecordTable, IoError> {
    let path = path.as_ref();
    let table = read_csv_from(BufReader::new(File::open(path)?))?;
    log_info!(
        component = "ingest",
        event = "csv_loaded",
        path = %path.display(),
        rows = table.num_rows(),
        columns = table.schema().fields().len(),
    );
    Ok(table)
}

/// Reads a headered CSV into a table of nullable `Utf8` columns. Types are not
/// inferred; empty fields become absent values.
///
/// # Errors
/// [`IoError::EmptyHeader`] when no column survives normalization, otherwise
/// decoding errors.
pub fn read_csv_from<R>(mut reader: R) -> Result<RecordTable, IoError>
where
    R: Read + Seek,
{
    let mut probe = [0u8; 1];
    if reader.read(&mut probe)? == 0 {
        return Err(IoError::EmptyHeader);
    }
    reader.rewind()?;

    let format = Format::default().with_header(true);
    let (header, _) = format.infer_schema(&mut reader, Some(0))?;
    reader.rewind()?;

    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|field| Field::new(normalize_column_name(field.name()), DataType::Utf8, true))
        .collect();
    if fields.is_empty() || fields.iter().all(|field| field.name().is_empty()) {
        return Err(IoError::EmptyHeader);
    }
    let mut seen = BTreeSet::new();
    if let Some(field) = fields.iter().find(|field| !seen.insert(field.name().as_str())) {
        return Err(IoError::DuplicateColumn(field.name().clone()));
    }
    let renamed = fields
        .iter()
        .zip(header.fields().iter())
        .filter(|(normalized, raw)| normalized.name() != raw.name())
        .count();
    if renamed > 0 {
        log_warn!(
            component = "ingest",
            event = "header_normalized",
            renamed = renamed,
        );
    }

    let schema = Arc::new(Schema::new(fields));
    let csv = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(reader)?;
    let batches = csv.collect::<Result<Vec<_>, _>>()?;
    Ok(RecordTable::new(concat_batches(&schema, &batches)?))
}
