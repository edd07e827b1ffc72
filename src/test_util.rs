//! Test-only helpers for building observation tables.

use crate::table::RecordTable;

/// Builds a two-column `user`/`app` table from pairs.
pub(crate) fn user_app_table(rows: &[(&str, &str)]) -> RecordTable {
    RecordTable::from_rows(
        &["user", "app"],
        rows.iter().map(|(user, app)| [Some(*user), Some(*app)]),
    )
    .expect("user/app table")
}

/// `(alice, Foo)`, `(alice, Bar)`, `(bob, Foo)`.
pub(crate) fn observations() -> RecordTable {
    user_app_table(&[("alice", "Foo"), ("alice", "Bar"), ("bob", "Foo")])
}
