#![deny(missing_docs)]
//! Arrow-based presence matrices for (user, application) observations.
//!
//! An observation table is filtered by clause groups of membership and
//! pattern predicates, pivoted into a dense user × application grid of
//! present/absent flags, and cut into column pages for display or column
//! chunks for export.
//!
//! ```ignore
//! let mask = evaluate_filter(&filter, &table)?;
//! let filtered = table.filter(mask.as_boolean_array())?;
//! let matrix = build_matrix(&filtered, "Username", "Name")?;
//! let page = paginate(&matrix, 0, page_size);
//! ```
//!
//! Everything in the core is synchronous and pure: tables are never mutated,
//! and the same inputs always yield the same matrix.

mod observability;

/// Read-only observation table.
pub mod table;

/// Clause-group filter expressions and their evaluation.
pub mod filter;

/// Presence matrix construction, pagination and chunking.
pub mod matrix;

/// Shared settings.
pub mod option;

/// Interactive filter and pagination state.
pub mod session;

/// CSV ingestion, matrix export and saved filters.
pub mod io;

#[cfg(test)]
mod test_util;

pub use crate::{
    filter::{
        evaluate_filter, Clause, FilterError, FilterExpr, Operator, Predicate, PredicateKind,
        RowMask,
    },
    matrix::{
        build_matrix,
        page::{chunk, paginate, Chunks, Page},
        MatrixError, PresenceMatrix,
    },
    option::MatrixOption,
    session::{Session, View},
    table::RecordTable,
};
