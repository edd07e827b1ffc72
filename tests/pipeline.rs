mod common;

use std::num::NonZeroUsize;

use appmatrix::{
    build_matrix, chunk, evaluate_filter, paginate, Clause, FilterError, FilterExpr, MatrixError,
    Operator, Predicate,
};
use common::{observations, user_app_table};

fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

#[test]
fn identity_filter_matrix() {
    let table = observations();
    let mask = evaluate_filter(&FilterExpr::default(), &table).unwrap();
    assert_eq!(mask.selected_count(), 3);

    let filtered = table.filter(mask.as_boolean_array()).unwrap();
    let matrix = build_matrix(&filtered, "user", "app").unwrap();
    assert_eq!(matrix.rows(), ["alice", "bob"]);
    assert_eq!(matrix.columns(), ["Bar", "Foo"]);
    assert!(matrix.is_present("alice", "Bar"));
    assert!(matrix.is_present("alice", "Foo"));
    assert!(!matrix.is_present("bob", "Bar"));
    assert!(matrix.is_present("bob", "Foo"));
}

#[test]
fn membership_filter_matrix() {
    let table = observations();
    let expr = FilterExpr::default()
        .with(Clause::new(Operator::And).with(Predicate::membership("user", ["bob"])));
    let mask = evaluate_filter(&expr, &table).unwrap();
    assert_eq!(mask.selected_rows().collect::<Vec<_>>(), vec![2]);

    let filtered = table.filter(mask.as_boolean_array()).unwrap();
    let matrix = build_matrix(&filtered, "user", "app").unwrap();
    assert_eq!(matrix.rows(), ["bob"]);
    assert_eq!(matrix.columns(), ["Foo"]);
    assert!(matrix.is_present("bob", "Foo"));
}

#[test]
fn single_column_pagination() {
    let matrix = build_matrix(&observations(), "user", "app").unwrap();
    let pages: Vec<_> = (0..2).map(|i| paginate(&matrix, i, size(1))).collect();
    assert_eq!(pages[0].total_pages(), 2);
    assert_eq!(pages[0].columns(), ["Bar"]);
    assert_eq!(pages[1].columns(), ["Foo"]);
    assert_eq!(paginate(&matrix, 5, size(1)), pages[1]);
}

#[test]
fn filter_selecting_nothing_gives_empty_matrix() {
    let table = observations();
    let expr = FilterExpr::default()
        .with(Clause::new(Operator::Or).with(Predicate::pattern("app", "^Qux$")));
    let mask = evaluate_filter(&expr, &table).unwrap();
    let filtered = table.filter(mask.as_boolean_array()).unwrap();
    let matrix = build_matrix(&filtered, "user", "app").unwrap();
    assert_eq!((matrix.row_count(), matrix.column_count()), (0, 0));
    assert_eq!(paginate(&matrix, 0, size(10)).total_pages(), 0);
    assert_eq!(chunk(&matrix, size(10)).count(), 0);
}

#[test]
fn pattern_errors_surface_before_scanning() {
    let table = user_app_table(&[]);
    let expr = FilterExpr::default()
        .with(Clause::new(Operator::And).with(Predicate::pattern("app", "(unclosed")));
    assert!(matches!(
        evaluate_filter(&expr, &table),
        Err(FilterError::InvalidPattern { .. })
    ));
}

#[test]
fn missing_axis_is_reported() {
    let table = observations();
    assert!(matches!(
        build_matrix(&table, "Username", "Name"),
        Err(MatrixError::MissingColumn(_))
    ));
}

#[test]
fn chunk_union_is_the_matrix() {
    let rows: Vec<(String, String)> = (0..40)
        .map(|i| (format!("user{}", i % 6), format!("app{:02}", i % 17)))
        .collect();
    let borrowed: Vec<(&str, &str)> = rows
        .iter()
        .map(|(u, a)| (u.as_str(), a.as_str()))
        .collect();
    let matrix = build_matrix(&user_app_table(&borrowed), "user", "app").unwrap();
    assert_eq!(matrix.column_count(), 17);

    let chunks: Vec<_> = chunk(&matrix, size(5)).collect();
    assert_eq!(chunks.len(), 4);
    let mut columns = Vec::new();
    for piece in &chunks {
        assert_eq!(piece.rows(), matrix.rows());
        for (offset, column) in piece.columns().iter().enumerate() {
            for (row, user) in piece.rows().iter().enumerate() {
                assert_eq!(piece.cell(row, offset), matrix.is_present(user, column));
            }
        }
        columns.extend_from_slice(piece.columns());
    }
    assert_eq!(columns, matrix.columns());
    assert_eq!(chunks, chunk(&matrix, size(5)).collect::<Vec<_>>());
}
