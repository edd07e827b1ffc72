//! Column pagination and chunking.
//!
//! Both split the column axis, in its sorted order, into consecutive windows
//! of `size` columns (the last window may be shorter). Rows are never split.

use std::num::NonZeroUsize;

use super::PresenceMatrix;

/// Number of windows needed to cover `columns` columns.
#[must_use]
pub fn total_pages(columns: usize, size: NonZeroUsize) -> usize {
    columns.div_ceil(size.get())
}

/// Clamps `page_index` into `[0, total_pages - 1]`, or to 0 when there are no
/// pages.
#[must_use]
pub fn clamp_page(page_index: usize, total_pages: usize) -> usize {
    page_index.min(total_pages.saturating_sub(1))
}

/// One window of a presence matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    index: usize,
    total_pages: usize,
    total_columns: usize,
    matrix: PresenceMatrix,
}

impl Page {
    /// Zero-based page index after clamping.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based page number for display.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Number of pages of the source matrix.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Number of columns of the source matrix.
    #[must_use]
    pub fn total_columns(&self) -> usize {
        self.total_columns
    }

    /// Every row-identity of the source matrix.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        self.matrix.rows()
    }

    /// Column-identities visible on this page.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.matrix.columns()
    }

    /// The page as a matrix of its own.
    #[must_use]
    pub fn matrix(&self) -> &PresenceMatrix {
        &self.matrix
    }

    /// Consumes the page, returning its matrix.
    #[must_use]
    pub fn into_matrix(self) -> PresenceMatrix {
        self.matrix
    }
}

/// Returns window `page_index` of `matrix`. Indices past the end clamp to the
/// last page.
#[must_use]
pub fn paginate(matrix: &PresenceMatrix, page_index: usize, page_size: NonZeroUsize) -> Page {
    let total_columns = matrix.column_count();
    let total_pages = total_pages(total_columns, page_size);
    let index = clamp_page(page_index, total_pages);
    let start = index * page_size.get();
    Page {
        index,
        total_pages,
        total_columns,
        matrix: matrix.select_columns(start..start + page_size.get()),
    }
}

/// Finite, restartable sequence of column chunks of a matrix.
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    matrix: &'a PresenceMatrix,
    size: NonZeroUsize,
    next: usize,
}

impl Iterator for Chunks<'_> {
    type Item = PresenceMatrix;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next;
        if start >= self.matrix.column_count() {
            return None;
        }
        self.next = start + self.size.get();
        Some(self.matrix.select_columns(start..self.next))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.matrix.column_count().saturating_sub(self.next);
        let chunks = remaining.div_ceil(self.size.get());
        (chunks, Some(chunks))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

/// Splits `matrix` into chunks of `chunk_size` columns. Each call starts over.
#[must_use]
pub fn chunk(matrix: &PresenceMatrix, chunk_size: NonZeroUsize) -> Chunks<'_> {
    Chunks {
        matrix,
        size: chunk_size,
        next: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        matrix::build_matrix,
        test_util::{observations, user_app_table},
    };

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn wide_matrix(columns: usize) -> PresenceMatrix {
        let apps: Vec<String> = (0..columns).map(|i| format!("app{i:03}")).collect();
        let rows: Vec<(&str, &str)> = apps
            .iter()
            .enumerate()
            .map(|(i, app)| (if i % 2 == 0 { "alice" } else { "bob" }, app.as_str()))
            .collect();
        build_matrix(&user_app_table(&rows), "user", "app").unwrap()
    }

    #[test]
    fn single_column_pages() {
        let matrix = build_matrix(&observations(), "user", "app").unwrap();
        let first = paginate(&matrix, 0, size(1));
        assert_eq!(first.total_pages(), 2);
        assert_eq!(first.columns(), ["Bar"]);
        assert_eq!(first.rows(), ["alice", "bob"]);

        let second = paginate(&matrix, 1, size(1));
        assert_eq!(second.columns(), ["Foo"]);

        let clamped = paginate(&matrix, 5, size(1));
        assert_eq!(clamped.index(), 1);
        assert_eq!(clamped.columns(), ["Foo"]);
    }

    #[test]
    fn pages_cover_columns_exactly_once() {
        for columns in [0, 1, 7, 10, 23] {
            let matrix = wide_matrix(columns);
            for page_size in 1..=12 {
                let page_size = size(page_size);
                let pages = total_pages(columns, page_size);
                let mut seen = Vec::new();
                for index in 0..pages {
                    let page = paginate(&matrix, index, page_size);
                    assert!(page.columns().len() <= page_size.get());
                    assert_eq!(page.rows(), matrix.rows());
                    seen.extend_from_slice(page.columns());
                }
                assert_eq!(seen, matrix.columns());
            }
        }
    }

    #[test]
    fn page_cells_match_source() {
        let matrix = wide_matrix(9);
        let page = paginate(&matrix, 1, size(4));
        for (offset, column) in page.columns().iter().enumerate() {
            for (row, user) in page.rows().iter().enumerate() {
                assert_eq!(
                    page.matrix().cell(row, offset),
                    matrix.is_present(user, column)
                );
            }
        }
    }

    #[test]
    fn empty_matrix_has_no_pages() {
        let matrix = PresenceMatrix::empty("user", "app");
        let page = paginate(&matrix, 3, size(10));
        assert_eq!(page.total_pages(), 0);
        assert_eq!(page.index(), 0);
        assert!(page.columns().is_empty());
        assert_eq!(chunk(&matrix, size(10)).count(), 0);
    }

    #[test]
    fn chunks_are_restartable() {
        let matrix = wide_matrix(23);
        let first: Vec<_> = chunk(&matrix, size(5)).collect();
        let second: Vec<_> = chunk(&matrix, size(5)).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert_eq!(first[4].column_count(), 3);
        assert_eq!(chunk(&matrix, size(5)).len(), 5);
    }

    #[test]
    fn chunks_match_pages() {
        let matrix = wide_matrix(11);
        for (index, piece) in chunk(&matrix, size(3)).enumerate() {
            assert_eq!(piece, paginate(&matrix, index, size(3)).into_matrix());
        }
    }
}
