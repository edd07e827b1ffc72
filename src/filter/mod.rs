//! Clause-group filters over a [`RecordTable`].
//!
//! A [`FilterExpr`] is an ordered list of [`Clause`]s joined by one top-level
//! [`Operator`]; each clause joins its [`Predicate`]s with its own operator.
//! The owned tree is what callers build, mutate and persist. Before touching
//! any row it is resolved against the table schema, which checks every field
//! and compiles every pattern exactly once.
//!
//! Empty groups are treated differently at the two levels:
//!
//! - a clause without predicates contributes no mask and is left out of the
//!   top-level combination;
//! - an expression where no clause contributes selects every row.
//!
//! The second rule is what makes a freshly created filter show the whole table.

mod error;
mod eval;
mod resolve;

use std::{collections::BTreeSet, fmt};

pub use error::FilterError;
pub use eval::RowMask;
pub use resolve::{ResolvedClause, ResolvedFilter, ResolvedPredicate};
use serde::{Deserialize, Serialize};

use crate::{
    observability::log_debug,
    table::RecordTable,
};

/// Boolean connective used inside a clause and between clauses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Conjunction.
    #[default]
    And,
    /// Disjunction.
    Or,
}

impl Operator {
    /// Folds `value` into `acc` with this connective.
    #[must_use]
    pub fn apply(self, acc: bool, value: bool) -> bool {
        match self {
            Operator::And => acc && value,
            Operator::Or => acc || value,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => f.write_str("AND"),
            Operator::Or => f.write_str("OR"),
        }
    }
}

/// Test applied to one field of a row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PredicateKind {
    /// The string form of the cell is one of `values`.
    #[serde(rename = "Multiselect")]
    Membership {
        /// Accepted values. An empty set accepts nothing.
        #[serde(default)]
        values: BTreeSet<String>,
    },
    /// The string form of the cell contains a match of `regex`.
    #[serde(rename = "Regex")]
    Pattern {
        /// Unanchored, case-sensitive regular expression. Blank accepts nothing.
        #[serde(default)]
        regex: String,
    },
}

/// Single-field predicate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Column the predicate reads.
    pub field: String,
    /// What the predicate checks.
    #[serde(flatten)]
    pub kind: PredicateKind,
}

impl Predicate {
    /// Membership predicate over `values`.
    pub fn membership<F, I, V>(field: F, values: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            field: field.into(),
            kind: PredicateKind::Membership {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Pattern predicate with regular expression `regex`.
    pub fn pattern(field: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: PredicateKind::Pattern {
                regex: regex.into(),
            },
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PredicateKind::Membership { values } => {
                write!(f, "`{}` (Multiselect): {:?}", self.field, values)
            }
            PredicateKind::Pattern { regex } => {
                write!(f, "`{}` (Regex): {}", self.field, regex)
            }
        }
    }
}

/// Named group of predicates joined by one operator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Optional label shown by front ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Connective between the predicates.
    #[serde(rename = "logic", default)]
    pub operator: Operator,
    /// Predicates in insertion order.
    #[serde(rename = "fields", default)]
    pub predicates: Vec<Predicate>,
}

impl Clause {
    /// Empty clause using `operator`.
    #[must_use]
    pub fn new(operator: Operator) -> Self {
        Self {
            name: None,
            operator,
            predicates: Vec::new(),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a predicate.
    #[must_use]
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// True when the clause carries no predicates and so contributes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Top-level filter: clauses joined by one operator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Connective between contributing clauses.
    #[serde(rename = "logic", default)]
    pub operator: Operator,
    /// Clauses in insertion order.
    #[serde(default)]
    pub clauses: Vec<Clause>,
}

impl FilterExpr {
    /// Expression without clauses, selecting every row.
    #[must_use]
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            clauses: Vec::new(),
        }
    }

    /// Appends a clause.
    #[must_use]
    pub fn with(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Number of clauses that carry at least one predicate.
    #[must_use]
    pub fn contributing_clauses(&self) -> usize {
        self.clauses.iter().filter(|clause| !clause.is_empty()).count()
    }
}

/// Evaluates `expr` over every row of `table`.
///
/// # Errors
/// [`FilterError::FieldNotFound`] or [`FilterError::InvalidPattern`] when the
/// expression does not resolve against the table; no mask is produced then.
pub fn evaluate_filter(expr: &FilterExpr, table: &RecordTable) -> Result<RowMask, FilterError> {
    let resolved = expr.resolve(&table.schema())?;
    let mask = resolved.select(table)?;
    log_debug!(
        component = "filter",
        event = "filter_evaluated",
        operator = %expr.operator,
        clauses = expr.clauses.len(),
        contributing = expr.contributing_clauses(),
        rows = table.num_rows(),
        selected = mask.selected_count(),
    );
    Ok(mask)
}
