use std::collections::BTreeSet;

use arrow::datatypes::Schema;
use regex::Regex;

use super::{Clause, FilterError, FilterExpr, Operator, Predicate, PredicateKind};
use crate::table::{RecordTable, ABSENT};

#[derive(Clone, Debug)]
pub(crate) enum Matcher {
    /// Empty value set or blank pattern.
    Nothing,
    Membership(BTreeSet<String>),
    Pattern(Regex),
}

impl Matcher {
    pub(crate) fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Nothing => false,
            Matcher::Membership(values) => values.contains(value),
            Matcher::Pattern(regex) => regex.is_match(value),
        }
    }
}

/// Predicate bound to a column position, with its pattern compiled.
#[derive(Clone, Debug)]
pub struct ResolvedPredicate {
    field: String,
    index: usize,
    pub(crate) matcher: Matcher,
}

impl ResolvedPredicate {
    /// Column name the predicate reads.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Column position within the resolved schema.
    #[must_use]
    pub fn column_index(&self) -> usize {
        self.index
    }

    /// Tests a string-coerced cell. `None` stands for an absent value.
    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        self.matcher.matches(value.unwrap_or(ABSENT))
    }

    /// Tests row `row` of `table`.
    ///
    /// # Errors
    /// Fails when the cell cannot be read as a string.
    pub fn evaluate(&self, table: &RecordTable, row: usize) -> Result<bool, FilterError> {
        let cell = table.cell(row, self.index)?;
        Ok(self.matches(cell.as_deref()))
    }
}

/// Clause whose predicates are all resolved.
#[derive(Clone, Debug)]
pub struct ResolvedClause {
    pub(crate) operator: Operator,
    pub(crate) predicates: Vec<ResolvedPredicate>,
}

impl ResolvedClause {
    /// Resolved predicates in clause order.
    #[must_use]
    pub fn predicates(&self) -> &[ResolvedPredicate] {
        &self.predicates
    }

    /// Combined result for one row, or `None` when the clause has no
    /// predicates and therefore contributes nothing to its parent.
    ///
    /// # Errors
    /// Fails when a cell cannot be read as a string.
    pub fn evaluate(&self, table: &RecordTable, row: usize) -> Result<Option<bool>, FilterError> {
        let Some((first, rest)) = self.predicates.split_first() else {
            return Ok(None);
        };
        let mut acc = first.evaluate(table, row)?;
        for predicate in rest {
            match (self.operator, acc) {
                (Operator::And, false) | (Operator::Or, true) => break,
                _ => acc = self.operator.apply(acc, predicate.evaluate(table, row)?),
            }
        }
        Ok(Some(acc))
    }
}

/// Filter expression checked against a schema and ready to run.
#[derive(Clone, Debug)]
pub struct ResolvedFilter {
    pub(crate) operator: Operator,
    pub(crate) clauses: Vec<ResolvedClause>,
}

impl ResolvedFilter {
    /// Resolved clauses, including empty ones.
    #[must_use]
    pub fn clauses(&self) -> &[ResolvedClause] {
        &self.clauses
    }

    /// Whether row `row` is selected. Rows are selected when no clause
    /// contributes.
    ///
    /// # Errors
    /// Fails when a cell cannot be read as a string.
    pub fn evaluate(&self, table: &RecordTable, row: usize) -> Result<bool, FilterError> {
        let mut acc: Option<bool> = None;
        for clause in &self.clauses {
            if let Some(value) = clause.evaluate(table, row)? {
                acc = Some(match acc {
                    None => value,
                    Some(prev) => self.operator.apply(prev, value),
                });
            }
        }
        Ok(acc.unwrap_or(true))
    }
}

impl Predicate {
    /// Binds the predicate to `schema`.
    ///
    /// # Errors
    /// [`FilterError::FieldNotFound`] for an unknown field,
    /// [`FilterError::InvalidPattern`] for a malformed regular expression.
    pub fn resolve(&self, schema: &Schema) -> Result<ResolvedPredicate, FilterError> {
        let index = schema
            .index_of(&self.field)
            .map_err(|_| FilterError::FieldNotFound(self.field.clone()))?;
        let matcher = match &self.kind {
            PredicateKind::Membership { values } if values.is_empty() => Matcher::Nothing,
            PredicateKind::Membership { values } => Matcher::Membership(values.clone()),
            PredicateKind::Pattern { regex } if regex.trim().is_empty() => Matcher::Nothing,
            PredicateKind::Pattern { regex } => {
                let compiled =
                    Regex::new(regex).map_err(|source| FilterError::InvalidPattern {
                        field: self.field.clone(),
                        pattern: regex.clone(),
                        source,
                    })?;
                Matcher::Pattern(compiled)
            }
        };
        Ok(ResolvedPredicate {
            field: self.field.clone(),
            index,
            matcher,
        })
    }
}

impl Clause {
    /// Binds every predicate of the clause to `schema`.
    ///
    /// # Errors
    /// The first predicate resolution error.
    pub fn resolve(&self, schema: &Schema) -> Result<ResolvedClause, FilterError> {
        let mut predicates = Vec::with_capacity(self.predicates.len());
        for predicate in &self.predicates {
            predicates.push(predicate.resolve(schema)?);
        }
        Ok(ResolvedClause {
            operator: self.operator,
            predicates,
        })
    }
}

impl FilterExpr {
    /// Binds the whole expression to `schema`. Nothing is evaluated when any
    /// clause fails to resolve.
    ///
    /// # Errors
    /// The first clause resolution error.
    pub fn resolve(&self, schema: &Schema) -> Result<ResolvedFilter, FilterError> {
        let mut clauses = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            clauses.push(clause.resolve(schema)?);
        }
        Ok(ResolvedFilter {
            operator: self.operator,
            clauses,
        })
    }
}

#[cfg(test)]
mod tests {
    use arrow::datatypes::{DataType, Field};

    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("Username", DataType::Utf8, true),
            Field::new("Name", DataType::Utf8, true),
        ])
    }

    #[test]
    fn unknown_field_is_an_error() {
        let err = Predicate::membership("Hostname", ["x"])
            .resolve(&schema())
            .unwrap_err();
        assert!(matches!(err, FilterError::FieldNotFound(ref f) if f == "Hostname"));
    }

    #[test]
    fn unknown_field_fails_even_with_empty_operand() {
        let err = Predicate::pattern("Hostname", "")
            .resolve(&schema())
            .unwrap_err();
        assert!(matches!(err, FilterError::FieldNotFound(_)));
    }

    #[test]
    fn malformed_pattern_fails_at_resolution() {
        let expr = FilterExpr::default()
            .with(Clause::new(Operator::And).with(Predicate::pattern("Name", "(unclosed")));
        let err = expr.resolve(&schema()).unwrap_err();
        match err {
            FilterError::InvalidPattern { field, pattern, .. } => {
                assert_eq!(field, "Name");
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_operands_match_nothing() {
        let schema = schema();
        let empty_set = Predicate::membership("Name", Vec::<String>::new())
            .resolve(&schema)
            .unwrap();
        let blank = Predicate::pattern("Name", "   ").resolve(&schema).unwrap();
        for value in [None, Some(""), Some("Foo"), Some("   ")] {
            assert!(!empty_set.matches(value));
            assert!(!blank.matches(value));
        }
    }

    #[test]
    fn pattern_is_unanchored_and_case_sensitive() {
        let predicate = Predicate::pattern("Name", "oo")
            .resolve(&schema())
            .unwrap();
        assert!(predicate.matches(Some("Foo")));
        assert!(predicate.matches(Some("Zoom")));
        assert!(!predicate.matches(Some("FOO")));
        assert_eq!(predicate.column_index(), 1);
    }

    #[test]
    fn absent_cells_compare_as_empty_string() {
        let predicate = Predicate::membership("Name", [""]).resolve(&schema()).unwrap();
        assert!(predicate.matches(None));
        assert!(!predicate.matches(Some("Foo")));
    }
}
