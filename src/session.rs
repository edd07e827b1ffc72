//! Interactive view state threaded through filter, build and paginate calls.
//!
//! A [`Session`] owns the filter being edited and the column-page cursor. It
//! never holds on to a table or a matrix: [`Session::render`] derives both from
//! the table it is handed.

use std::collections::BTreeSet;

use crate::{
    filter::{evaluate_filter, Clause, FilterError, FilterExpr, Operator, Predicate},
    matrix::{
        build_matrix,
        page::{clamp_page, paginate, Page},
        MatrixError, PresenceMatrix,
    },
    observability::{log_debug, log_info},
    option::MatrixOption,
    table::RecordTable,
};

/// Result of one render: the visible page plus summary counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    /// Visible window of the matrix.
    pub page: Page,
    /// Rows of the table that passed the filter.
    pub selected_rows: usize,
    /// Rows of the table before filtering.
    pub total_rows: usize,
}

impl View {
    /// Number of row-identities shown.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.page.rows().len()
    }

    /// Number of column-identities on this page.
    #[must_use]
    pub fn visible_columns(&self) -> usize {
        self.page.columns().len()
    }

    /// Number of column-identities across all pages.
    #[must_use]
    pub fn total_columns(&self) -> usize {
        self.page.total_columns()
    }
}

/// Filter and pagination state for one viewer.
#[derive(Clone, Debug)]
pub struct Session {
    option: MatrixOption,
    filter: FilterExpr,
    page: usize,
    total_pages: usize,
}

impl Session {
    /// Starts with one empty `AND` clause, `AND` between clauses, first page.
    #[must_use]
    pub fn new(option: MatrixOption) -> Self {
        Self {
            option,
            filter: FilterExpr::new(Operator::And).with(Clause::new(Operator::And)),
            page: 0,
            total_pages: 0,
        }
    }

    /// Settings in effect.
    #[must_use]
    pub fn option(&self) -> &MatrixOption {
        &self.option
    }

    /// Current filter.
    #[must_use]
    pub fn filter(&self) -> &FilterExpr {
        &self.filter
    }

    /// Current zero-based page index.
    #[must_use]
    pub fn page_index(&self) -> usize {
        self.page
    }

    /// Page count observed by the last render.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Appends an empty `AND` clause and returns its index.
    pub fn add_clause(&mut self) -> usize {
        self.filter.clauses.push(Clause::new(Operator::And));
        self.filter.clauses.len() - 1
    }

    /// Drops the last clause unless it is the only one left.
    pub fn remove_last_clause(&mut self) -> Option<Clause> {
        if self.filter.clauses.len() > 1 {
            self.filter.clauses.pop()
        } else {
            None
        }
    }

    /// Sets the operator of clause `clause`. Returns `false` for an unknown
    /// clause.
    pub fn set_clause_operator(&mut self, clause: usize, operator: Operator) -> bool {
        match self.filter.clauses.get_mut(clause) {
            Some(target) => {
                target.operator = operator;
                true
            }
            None => false,
        }
    }

    /// Appends `predicate` to clause `clause`. Returns `false` for an unknown
    /// clause.
    pub fn add_predicate(&mut self, clause: usize, predicate: Predicate) -> bool {
        match self.filter.clauses.get_mut(clause) {
            Some(target) => {
                target.predicates.push(predicate);
                true
            }
            None => false,
        }
    }

    /// Sets the operator between clauses.
    pub fn set_operator(&mut self, operator: Operator) {
        self.filter.operator = operator;
    }

    /// Swaps in `filter` after checking that it resolves against `table`.
    /// The current filter is kept when it does not.
    ///
    /// # Errors
    /// The resolution error of `filter`.
    pub fn replace_filter(
        &mut self,
        filter: FilterExpr,
        table: &RecordTable,
    ) -> Result<FilterExpr, FilterError> {
        filter.resolve(&table.schema())?;
        log_info!(
            component = "session",
            event = "filter_replaced",
            clauses = filter.clauses.len(),
            contributing = filter.contributing_clauses(),
        );
        Ok(std::mem::replace(&mut self.filter, filter))
    }

    /// Moves to the next page. No-op on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous page. No-op on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to `page`, clamped to the page count of the last render.
    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.total_pages);
    }

    /// Filters `table` and builds the full presence matrix.
    ///
    /// # Errors
    /// Filter errors and missing axis columns.
    pub fn matrix(&self, table: &RecordTable) -> Result<(PresenceMatrix, usize), MatrixError> {
        let mask = evaluate_filter(&self.filter, table)?;
        let selected = mask.selected_count();
        let filtered = table.filter(mask.as_boolean_array())?;
        let matrix = build_matrix(
            &filtered,
            &self.option.row_column,
            &self.option.col_column,
        )?;
        Ok((matrix, selected))
    }

    /// Filters, pivots and paginates `table` at the current cursor, clamping
    /// the cursor into range.
    ///
    /// # Errors
    /// Filter errors and missing axis columns. The cursor is left untouched.
    pub fn render(&mut self, table: &RecordTable) -> Result<View, MatrixError> {
        let (matrix, selected_rows) = self.matrix(table)?;
        let page = paginate(&matrix, self.page, self.option.page_size);
        self.total_pages = page.total_pages();
        self.page = clamp_page(self.page, self.total_pages);
        log_debug!(
            component = "session",
            event = "view_rendered",
            page = page.number(),
            total_pages = page.total_pages(),
            rows = page.rows().len(),
            columns = page.columns().len(),
        );
        Ok(View {
            page,
            selected_rows,
            total_rows: table.num_rows(),
        })
    }

    /// Renders the one-based page `number`. Numbers past the last page show the
    /// last page; `0` shows the first.
    ///
    /// # Errors
    /// As [`Session::render`].
    pub fn render_page(
        &mut self,
        table: &RecordTable,
        number: usize,
    ) -> Result<View, MatrixError> {
        self.page = number.saturating_sub(1);
        self.render(table)
    }
}

/// Sorted distinct non-absent values of column `field`: the choices offered
/// for a membership predicate.
///
/// # Errors
/// [`MatrixError::MissingColumn`] for an unknown column.
pub fn distinct_values(table: &RecordTable, field: &str) -> Result<Vec<String>, MatrixError> {
    let index = table
        .column_index(field)
        .ok_or_else(|| MatrixError::MissingColumn(field.to_string()))?;
    let strings = table.coerced_strings(index)?;
    let values: BTreeSet<&str> = strings.iter().flatten().collect();
    Ok(values.into_iter().map(str::to_string).collect())
}

/// Configured filterable columns that exist in `table`, in configured order.
#[must_use]
pub fn columns_of_interest<'a>(option: &'a MatrixOption, table: &RecordTable) -> Vec<&'a str> {
    option
        .filterable_columns
        .iter()
        .map(String::as_str)
        .filter(|column| table.column_index(column).is_some())
        .collect()
}
