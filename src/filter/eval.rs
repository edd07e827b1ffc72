use std::collections::HashMap;

use arrow::{
    array::{BooleanArray, StringArray},
    compute::{and, or},
    error::ArrowError,
};

use super::{
    resolve::{Matcher, ResolvedClause, ResolvedPredicate},
    FilterError, Operator, ResolvedFilter,
};
use crate::table::{RecordTable, ABSENT};

/// Row-selection mask over a [`RecordTable`]. Never contains nulls.
#[derive(Clone, Debug, PartialEq)]
pub struct RowMask {
    mask: BooleanArray,
}

impl RowMask {
    /// Mask selecting all `len` rows.
    #[must_use]
    pub fn all(len: usize) -> Self {
        Self {
            mask: BooleanArray::from(vec![true; len]),
        }
    }

    /// Number of rows the mask spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    /// True when the mask spans no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Number of selected rows.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.mask.true_count()
    }

    /// Whether row `row` is selected. Out-of-range rows are not.
    #[must_use]
    pub fn is_selected(&self, row: usize) -> bool {
        row < self.mask.len() && self.mask.value(row)
    }

    /// Indices of the selected rows in ascending order.
    pub fn selected_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.mask.len()).filter(|row| self.mask.value(*row))
    }

    /// Mask as an Arrow boolean array.
    #[must_use]
    pub fn as_boolean_array(&self) -> &BooleanArray {
        &self.mask
    }
}

impl From<BooleanArray> for RowMask {
    fn from(mask: BooleanArray) -> Self {
        Self { mask }
    }
}

/// Folds `masks` with `operator`; `None` when there is nothing to fold.
fn combine<I>(operator: Operator, masks: I) -> Result<Option<BooleanArray>, ArrowError>
where
    I: IntoIterator<Item = BooleanArray>,
{
    let mut acc: Option<BooleanArray> = None;
    for mask in masks {
        acc = Some(match acc {
            None => mask,
            Some(prev) => match operator {
                Operator::And => and(&prev, &mask)?,
                Operator::Or => or(&prev, &mask)?,
            },
        });
    }
    Ok(acc)
}

/// String-coerced columns, read once per evaluation.
struct ColumnCache<'a> {
    table: &'a RecordTable,
    columns: HashMap<usize, StringArray>,
}

impl<'a> ColumnCache<'a> {
    fn new(table: &'a RecordTable) -> Self {
        Self {
            table,
            columns: HashMap::new(),
        }
    }

    fn get(&mut self, index: usize) -> Result<&StringArray, ArrowError> {
        if !self.columns.contains_key(&index) {
            let strings = self.table.coerced_strings(index)?;
            self.columns.insert(index, strings);
        }
        self.columns.get(&index).ok_or_else(|| {
            ArrowError::InvalidArgumentError(format!("column {index} missing from cache"))
        })
    }
}

impl ResolvedPredicate {
    fn mask(&self, cache: &mut ColumnCache<'_>, rows: usize) -> Result<BooleanArray, ArrowError> {
        if matches!(self.matcher, Matcher::Nothing) {
            return Ok(BooleanArray::from(vec![false; rows]));
        }
        let strings = cache.get(self.column_index())?;
        Ok(strings
            .iter()
            .map(|value| Some(self.matcher.matches(value.unwrap_or(ABSENT))))
            .collect())
    }
}

impl ResolvedClause {
    fn mask(
        &self,
        cache: &mut ColumnCache<'_>,
        rows: usize,
    ) -> Result<Option<BooleanArray>, ArrowError> {
        let mut masks = Vec::with_capacity(self.predicates.len());
        for predicate in &self.predicates {
            masks.push(predicate.mask(cache, rows)?);
        }
        combine(self.operator, masks)
    }
}

impl ResolvedFilter {
    /// Evaluates every contributing clause over the whole table at once.
    ///
    /// # Errors
    /// Fails when a column cannot be read as strings or a kernel fails.
    pub fn select(&self, table: &RecordTable) -> Result<RowMask, FilterError> {
        let rows = table.num_rows();
        let mut cache = ColumnCache::new(table);
        let mut masks = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            if let Some(mask) = clause.mask(&mut cache, rows)? {
                masks.push(mask);
            }
        }
        Ok(match combine(self.operator, masks)? {
            Some(mask) => RowMask::from(mask),
            None => RowMask::all(rows),
        })
    }
}
