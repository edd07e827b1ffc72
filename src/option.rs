use std::{num::NonZeroUsize, path::PathBuf};

const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => NonZeroUsize::MIN,
    }
}

/// Columns the filter front end offers, when present in the table.
pub const FILTERABLE_COLUMNS: [&str; 14] = [
    "Name",
    "LatestVersion",
    "Hostname",
    "Username",
    "CaughtInProcess",
    "FileSource",
    "PackagedAppMatch",
    "PackagedAppMatchScore",
    "PackagedAppCompatible",
    "WingetMatchName",
    "WingetMatchScore",
    "WingetCompatible",
    "IsNoise",
    "Category",
];

/// Settings shared by the session, exporters and the CLI.
#[derive(Debug, Clone)]
pub struct MatrixOption {
    pub(crate) row_column: String,
    pub(crate) col_column: String,
    pub(crate) page_size: NonZeroUsize,
    pub(crate) chunk_size: NonZeroUsize,
    pub(crate) filter_dir: PathBuf,
    pub(crate) default_filter: String,
    pub(crate) chunk_dir: PathBuf,
    pub(crate) filterable_columns: Vec<String>,
}

impl Default for MatrixOption {
    fn default() -> Self {
        MatrixOption {
            row_column: "Username".to_string(),
            col_column: "Name".to_string(),
            page_size: non_zero(10),
            chunk_size: non_zero(50),
            filter_dir: PathBuf::from("saved_filters"),
            default_filter: "Default Filter.json".to_string(),
            chunk_dir: PathBuf::from("matrix_chunks"),
            filterable_columns: FILTERABLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl MatrixOption {
    /// Column whose distinct values form the matrix rows.
    pub fn row_column(self, row_column: impl Into<String>) -> Self {
        MatrixOption {
            row_column: row_column.into(),
            ..self
        }
    }

    /// Column whose distinct values form the matrix columns.
    pub fn col_column(self, col_column: impl Into<String>) -> Self {
        MatrixOption {
            col_column: col_column.into(),
            ..self
        }
    }

    /// Columns per interactive page.
    pub fn page_size(self, page_size: NonZeroUsize) -> Self {
        MatrixOption { page_size, ..self }
    }

    /// Columns per exported chunk file.
    pub fn chunk_size(self, chunk_size: NonZeroUsize) -> Self {
        MatrixOption { chunk_size, ..self }
    }

    /// Directory holding saved filter files.
    pub fn filter_dir(self, filter_dir: impl Into<PathBuf>) -> Self {
        MatrixOption {
            filter_dir: filter_dir.into(),
            ..self
        }
    }

    /// File name of the filter loaded at startup.
    pub fn default_filter(self, default_filter: impl Into<String>) -> Self {
        MatrixOption {
            default_filter: default_filter.into(),
            ..self
        }
    }

    /// Directory chunk files are written to.
    pub fn chunk_dir(self, chunk_dir: impl Into<PathBuf>) -> Self {
        MatrixOption {
            chunk_dir: chunk_dir.into(),
            ..self
        }
    }

    /// Columns offered for filtering.
    pub fn filterable_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MatrixOption {
            filterable_columns: columns.into_iter().map(Into::into).collect(),
            ..self
        }
    }
}

impl MatrixOption {
    /// See [`MatrixOption::row_column`].
    pub fn row_column_name(&self) -> &str {
        &self.row_column
    }

    /// See [`MatrixOption::col_column`].
    pub fn col_column_name(&self) -> &str {
        &self.col_column
    }

    /// Configured page width.
    pub fn page_width(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Configured chunk width.
    pub fn chunk_width(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Saved filter directory.
    pub fn filter_dir_path(&self) -> &PathBuf {
        &self.filter_dir
    }

    /// Default filter file name.
    pub fn default_filter_name(&self) -> &str {
        &self.default_filter
    }

    /// Chunk output directory.
    pub fn chunk_dir_path(&self) -> &PathBuf {
        &self.chunk_dir
    }

    /// Filterable column names.
    pub fn filterable_column_names(&self) -> &[String] {
        &self.filterable_columns
    }
}
