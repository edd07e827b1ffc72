//! Read-only record table backed by an Arrow [`RecordBatch`].
//!
//! Every observation is one row; every row carries the full column set, with
//! missing values stored as Arrow nulls rather than omitted. Predicates and the
//! matrix builder read cells through their string representation, so any Arrow
//! type that casts to `Utf8` can participate.

use std::sync::Arc;

use arrow::{
    array::{Array, ArrayRef, AsArray, BooleanArray, RecordBatch, StringArray, StringBuilder},
    compute::{cast, filter_record_batch},
    datatypes::{DataType, Field, Schema, SchemaRef},
    error::ArrowError,
};

/// String that absent (null) cells coerce to when a predicate inspects them.
pub const ABSENT: &str = "";

/// Immutable, column-named table of observation rows.
#[derive(Clone, Debug)]
pub struct RecordTable {
    batch: RecordBatch,
}

impl RecordTable {
    /// Wraps an existing batch. Column names are taken as-is.
    #[must_use]
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Builds a table of nullable `Utf8` columns from row-major values.
    ///
    /// # Errors
    /// Returns [`ArrowError::InvalidArgumentError`] when a row's width differs
    /// from the number of columns.
    pub fn from_rows<I, R, V>(columns: &[&str], rows: I) -> Result<Self, ArrowError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Option<V>>,
        V: AsRef<str>,
    {
        let mut builders: Vec<StringBuilder> =
            columns.iter().map(|_| StringBuilder::new()).collect();
        for (row_index, row) in rows.into_iter().enumerate() {
            let mut width = 0;
            for cell in row {
                if let Some(builder) = builders.get_mut(width) {
                    builder.append_option(cell);
                }
                width += 1;
            }
            if width != columns.len() {
                return Err(ArrowError::InvalidArgumentError(format!(
                    "row {row_index} has {width} cells, expected {}",
                    columns.len()
                )));
            }
        }
        let schema = Arc::new(Schema::new(
            columns
                .iter()
                .map(|name| Field::new(*name, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));
        let arrays = builders
            .into_iter()
            .map(|mut builder| Arc::new(builder.finish()) as ArrayRef)
            .collect();
        Ok(Self::new(RecordBatch::try_new(schema, arrays)?))
    }

    /// Arrow schema of the table.
    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Underlying batch.
    #[must_use]
    pub fn as_record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of observation rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|field| field.name().as_str())
    }

    /// Position of the column called `name`, if any.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.batch.schema_ref().index_of(name).ok()
    }

    /// Column `index` coerced to its string representation. Nulls stay null.
    ///
    /// # Errors
    /// Propagates the cast error when the column type has no `Utf8` form.
    pub fn coerced_strings(&self, index: usize) -> Result<StringArray, ArrowError> {
        let column = self.batch.column(index);
        if column.data_type() == &DataType::Utf8 {
            return Ok(column.as_string::<i32>().clone());
        }
        let utf8 = cast(column, &DataType::Utf8)?;
        Ok(utf8.as_string::<i32>().clone())
    }

    /// String form of a single cell, `None` when the cell is absent.
    ///
    /// Each call casts a one-row slice. Whole-table scans go through
    /// [`ResolvedFilter::select`](crate::filter::ResolvedFilter::select) or
    /// [`RecordTable::coerced_strings`], which cast a column once.
    ///
    /// # Errors
    /// Propagates the cast error when the column type has no `Utf8` form.
    pub fn cell(&self, row: usize, index: usize) -> Result<Option<String>, ArrowError> {
        let column = self.batch.column(index);
        if row >= column.len() {
            return Err(ArrowError::InvalidArgumentError(format!(
                "row {row} out of bounds for {} rows",
                column.len()
            )));
        }
        let single = cast(&column.slice(row, 1), &DataType::Utf8)?;
        let strings = single.as_string::<i32>();
        Ok(strings.is_valid(0).then(|| strings.value(0).to_string()))
    }

    /// Rows selected by `mask`, in their original order.
    ///
    /// # Errors
    /// Fails when the mask length differs from the row count.
    pub fn filter(&self, mask: &BooleanArray) -> Result<Self, ArrowError> {
        Ok(Self::new(filter_record_batch(&self.batch, mask)?))
    }
}

impl From<RecordBatch> for RecordTable {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}
