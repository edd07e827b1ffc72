//! Presence matrix: which row-identities were observed with which categories.
//!
//! The matrix is dense. Both axes are the sorted distinct values of their
//! source column, and every (row, column) pair of the cross product has a
//! cell. A cell is `true` as soon as one filtered observation links the pair;
//! repeated observations do not change it.

mod error;
pub mod page;

use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Range,
    sync::Arc,
};

use arrow::{
    array::{Array, ArrayRef, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
};
pub use error::MatrixError;

use crate::{observability::log_debug, table::RecordTable};

/// Cell text for a present pair in exported matrices.
pub const PRESENT: &str = "Yes";
/// Cell text for an absent pair in exported matrices.
pub const NOT_PRESENT: &str = "No";

/// Dense boolean grid keyed by (row-identity, column-identity).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresenceMatrix {
    row_label: String,
    column_label: String,
    rows: Vec<String>,
    columns: Vec<String>,
    // row-major, rows.len() * columns.len()
    cells: Vec<bool>,
}

impl PresenceMatrix {
    /// Matrix with no rows and no columns.
    #[must_use]
    pub fn empty(row_label: impl Into<String>, column_label: impl Into<String>) -> Self {
        Self {
            row_label: row_label.into(),
            column_label: column_label.into(),
            rows: Vec::new(),
            columns: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Name of the column the row axis was built from.
    #[must_use]
    pub fn row_label(&self) -> &str {
        &self.row_label
    }

    /// Name of the column the column axis was built from.
    #[must_use]
    pub fn column_label(&self) -> &str {
        &self.column_label
    }

    /// Row-identities in sorted order.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Column-identities in sorted order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of row-identities.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of column-identities.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the matrix has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at positional coordinates. Out-of-range coordinates read `false`.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> bool {
        if row >= self.rows.len() || column >= self.columns.len() {
            return false;
        }
        self.cells[row * self.columns.len() + column]
    }

    /// Cells of one row in column order.
    #[must_use]
    pub fn row_cells(&self, row: usize) -> &[bool] {
        let width = self.columns.len();
        self.cells
            .get(row * width..(row + 1) * width)
            .unwrap_or(&[])
    }

    /// Presence of the pair (`row`, `column`) by identity.
    #[must_use]
    pub fn is_present(&self, row: &str, column: &str) -> bool {
        match (
            self.rows.binary_search_by(|r| r.as_str().cmp(row)),
            self.columns.binary_search_by(|c| c.as_str().cmp(column)),
        ) {
            (Ok(r), Ok(c)) => self.cell(r, c),
            _ => false,
        }
    }

    /// Sub-matrix over a contiguous column range, keeping every row.
    #[must_use]
    pub fn select_columns(&self, range: Range<usize>) -> Self {
        let start = range.start.min(self.columns.len());
        let end = range.end.clamp(start, self.columns.len());
        let columns = self.columns[start..end].to_vec();
        let mut cells = Vec::with_capacity(self.rows.len() * columns.len());
        for row in 0..self.rows.len() {
            cells.extend_from_slice(&self.row_cells(row)[start..end]);
        }
        Self {
            row_label: self.row_label.clone(),
            column_label: self.column_label.clone(),
            rows: self.rows.clone(),
            columns,
            cells,
        }
    }

    /// Arrow form: the row-identity column first, then one `Yes`/`No` column
    /// per column-identity.
    ///
    /// # Errors
    /// Fails when two columns would share a name.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let mut fields = Vec::with_capacity(self.columns.len() + 1);
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.columns.len() + 1);
        fields.push(Field::new(&self.row_label, DataType::Utf8, false));
        arrays.push(Arc::new(StringArray::from_iter_values(&self.rows)));
        for (index, name) in self.columns.iter().enumerate() {
            fields.push(Field::new(name, DataType::Utf8, false));
            arrays.push(Arc::new(StringArray::from_iter_values(
                (0..self.rows.len()).map(|row| {
                    if self.cell(row, index) {
                        PRESENT
                    } else {
                        NOT_PRESENT
                    }
                }),
            )));
        }
        let names: BTreeSet<&str> = fields.iter().map(|f| f.name().as_str()).collect();
        if names.len() != fields.len() {
            return Err(ArrowError::InvalidArgumentError(format!(
                "column identity collides with row label '{}'",
                self.row_label
            )));
        }
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
    }
}

/// Pivots an already-filtered table into a presence matrix.
///
/// Rows whose identity or category cell is absent link no pair and are
/// skipped.
///
/// # Errors
/// [`MatrixError::MissingColumn`] when either axis column is missing.
pub fn build_matrix(
    table: &RecordTable,
    row_column: &str,
    col_column: &str,
) -> Result<PresenceMatrix, MatrixError> {
    let row_index = table
        .column_index(row_column)
        .ok_or_else(|| MatrixError::MissingColumn(row_column.to_string()))?;
    let col_index = table
        .column_index(col_column)
        .ok_or_else(|| MatrixError::MissingColumn(col_column.to_string()))?;
    let row_values = table.coerced_strings(row_index)?;
    let col_values = table.coerced_strings(col_index)?;

    let mut pairs = BTreeSet::new();
    for i in 0..table.num_rows() {
        if row_values.is_null(i) || col_values.is_null(i) {
            continue;
        }
        pairs.insert((row_values.value(i), col_values.value(i)));
    }

    let row_positions: BTreeMap<&str, usize> = pairs
        .iter()
        .map(|(row, _)| *row)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(position, row)| (row, position))
        .collect();
    let col_positions: BTreeMap<&str, usize> = pairs
        .iter()
        .map(|(_, col)| *col)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(position, col)| (col, position))
        .collect();

    let width = col_positions.len();
    let mut cells = vec![false; row_positions.len() * width];
    for (row, col) in &pairs {
        cells[row_positions[row] * width + col_positions[col]] = true;
    }

    let matrix = PresenceMatrix {
        row_label: row_column.to_string(),
        column_label: col_column.to_string(),
        rows: row_positions.keys().map(|r| r.to_string()).collect(),
        columns: col_positions.keys().map(|c| c.to_string()).collect(),
        cells,
    };
    log_debug!(
        component = "matrix",
        event = "matrix_built",
        source_rows = table.num_rows(),
        pairs = pairs.len(),
        rows = matrix.row_count(),
        columns = matrix.column_count(),
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{observations, user_app_table};

    #[test]
    fn identity_scenario() {
        let matrix = build_matrix(&observations(), "user", "app").unwrap();
        assert_eq!(matrix.rows(), ["alice", "bob"]);
        assert_eq!(matrix.columns(), ["Bar", "Foo"]);
        assert!(matrix.is_present("alice", "Bar"));
        assert!(matrix.is_present("alice", "Foo"));
        assert!(!matrix.is_present("bob", "Bar"));
        assert!(matrix.is_present("bob", "Foo"));
        assert_eq!(matrix.row_cells(1), [false, true]);
    }

    #[test]
    fn rebuild_is_identical() {
        let table = observations();
        assert_eq!(
            build_matrix(&table, "user", "app").unwrap(),
            build_matrix(&table, "user", "app").unwrap()
        );
    }

    #[test]
    fn duplicates_do_not_change_presence() {
        let once = build_matrix(&observations(), "user", "app").unwrap();
        let twice = build_matrix(
            &user_app_table(&[
                ("alice", "Foo"),
                ("alice", "Bar"),
                ("bob", "Foo"),
                ("bob", "Foo"),
                ("alice", "Foo"),
            ]),
            "user",
            "app",
        )
        .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_table_gives_empty_matrix() {
        let table = user_app_table(&[]);
        let matrix = build_matrix(&table, "user", "app").unwrap();
        assert_eq!(matrix.row_count(), 0);
        assert_eq!(matrix.column_count(), 0);
        assert!(matrix.is_empty());
    }

    #[test]
    fn missing_axis_column() {
        let table = observations();
        assert!(matches!(
            build_matrix(&table, "Username", "app"),
            Err(MatrixError::MissingColumn(ref c)) if c == "Username"
        ));
        assert!(matches!(
            build_matrix(&table, "user", "Name"),
            Err(MatrixError::MissingColumn(ref c)) if c == "Name"
        ));
    }

    #[test]
    fn absent_axis_values_are_skipped() {
        let table = RecordTable::from_rows(
            &["user", "app"],
            vec![
                vec![Some("alice"), None],
                vec![None, Some("Foo")],
                vec![Some("bob"), Some("Bar")],
            ],
        )
        .unwrap();
        let matrix = build_matrix(&table, "user", "app").unwrap();
        assert_eq!(matrix.rows(), ["bob"]);
        assert_eq!(matrix.columns(), ["Bar"]);
    }

    #[test]
    fn ordering_is_lexicographic_on_strings() {
        let table = user_app_table(&[("u10", "b"), ("u9", "B"), ("u1", "a")]);
        let matrix = build_matrix(&table, "user", "app").unwrap();
        assert_eq!(matrix.rows(), ["u1", "u10", "u9"]);
        assert_eq!(matrix.columns(), ["B", "a", "b"]);
    }

    #[test]
    fn column_slice_keeps_rows() {
        let matrix = build_matrix(&observations(), "user", "app").unwrap();
        let foo = matrix.select_columns(1..5);
        assert_eq!(foo.rows(), ["alice", "bob"]);
        assert_eq!(foo.columns(), ["Foo"]);
        assert_eq!(foo.row_cells(0), [true]);
        assert_eq!(matrix.select_columns(3..4).column_count(), 0);
    }

    #[test]
    fn record_batch_uses_yes_no() {
        let matrix = build_matrix(&observations(), "user", "app").unwrap();
        let batch = matrix.to_record_batch().unwrap();
        let schema = batch.schema();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name().clone()).collect();
        assert_eq!(names, ["user", "Bar", "Foo"]);
        let bar = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(bar.value(0), PRESENT);
        assert_eq!(bar.value(1), NOT_PRESENT);
    }
}
