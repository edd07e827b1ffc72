#![allow(dead_code)]

use appmatrix::RecordTable;

pub fn user_app_table(rows: &[(&str, &str)]) -> RecordTable {
    RecordTable::from_rows(
        &["user", "app"],
        rows.iter().map(|(user, app)| [Some(*user), Some(*app)]),
    )
    .expect("user/app table")
}

pub fn observations() -> RecordTable {
    user_app_table(&[("alice", "Foo"), ("alice", "Bar"), ("bob", "Foo")])
}

/// Inventory-style export with the usual column names.
pub const INVENTORY_CSV: &str = "\u{feff}Name ,Hostname,Username,Category\n\
Chrome,lab-01,alice,Browser\n\
Chrome,lab-02,bob,Browser\n\
Slack,lab-01,alice,Chat\n\
Zoom,desk-07,carol,Chat\n\
Notepad++,desk-07,carol,\n\
Chrome,desk-07,carol,Browser\n";
