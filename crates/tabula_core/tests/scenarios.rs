//! End-to-end behavior of the table model through its public API.

use tabula_core::{
    Cell, Column, Condition, Kind, Matrix, MissingOrder, Row, Sign, Table, TableError,
};

fn scores() -> Table {
    Table::from_columns(
        "scores",
        vec![
            Column::from_values("id", [1i64, 2, 3]).unwrap(),
            Column::from_cells(
                "score",
                vec![Cell::Double(1.5), Cell::Missing, Cell::Double(3.0)],
            )
            .unwrap(),
        ],
    )
    .unwrap()
}

fn grid(rows: &[&[i64]]) -> Matrix {
    Matrix::from_rows(
        "m",
        rows.iter()
            .map(|r| Row::from_values("r", r.iter().copied()))
            .collect(),
    )
    .unwrap()
}

// =============================================================================
// STATISTICS
// =============================================================================

#[test]
fn test_mean_skips_missing() {
    let table = scores();
    let score = table.column_by_name("score").unwrap();
    assert_eq!(score.mean().unwrap(), 2.25);
    assert_eq!(score.count_missing_values(), 1);
    assert_eq!(table.count_missing_values(), 1);
}

#[test]
fn test_summary_reports_stats() {
    let table = scores();
    let summary = table.column_by_name("score").unwrap().summary();
    assert_eq!(summary.kind, Some(Kind::Double));
    assert_eq!(summary.missing, 1);
    let stats = summary.stats.as_ref().expect("numeric column has stats");
    assert_eq!(stats.mean, 2.25);
    assert!(summary.to_string().contains("Missing:            1"));
}

// =============================================================================
// SCHEMA ENFORCEMENT
// =============================================================================

#[test]
fn test_add_row_rejects_schema_mismatch() {
    let mut table = Table::from_rows(
        "t",
        vec![Row::from_values("r1", [1i64, 2]), Row::from_values("r2", [3i64, 4])],
    )
    .unwrap();
    let err = table
        .add_row(Row::from_values("r3", [Cell::Integer(4), Cell::from("x")]))
        .unwrap_err();
    assert!(matches!(err, TableError::SchemaMismatch(_)));
    assert_eq!(table.nrow(), 2);
    assert_eq!(table.columns()[1].len(), 2);
}

#[test]
fn test_sentinel_row_upgrades_on_render() {
    let mut table = Table::from_rows(
        "t",
        vec![Row::from_values("r1", [Cell::Missing, Cell::from("a")])],
    )
    .unwrap();
    table
        .add_row(Row::from_values("r2", [Cell::Integer(7), Cell::from("b")]))
        .unwrap();
    assert_eq!(
        table.schema().unwrap().kinds(),
        &[Kind::Integer, Kind::Text]
    );
    table.render_state().unwrap();
    assert!(table.is_rendered());
    assert_eq!(table.rows()[0].schema().kinds(), &[Kind::Integer, Kind::Text]);
}

// =============================================================================
// SUBSETTING
// =============================================================================

#[test]
fn test_subset_by_missing_equality() {
    let table = scores();
    let only_missing = table
        .subset_by_condition(1, &Condition::equals(Cell::Missing).unwrap())
        .unwrap();
    assert_eq!(only_missing.name(), "scores_Subset");
    assert_eq!(only_missing.nrow(), 1);
    assert_eq!(only_missing.get(0, 0).unwrap(), &Cell::Integer(2));

    let err = Condition::less_than(Cell::Missing).unwrap_err();
    assert!(matches!(err, TableError::InvalidCondition(_)));
}

#[test]
fn test_subset_by_threshold() {
    let table = scores();
    let cond = Condition::greater_than(2.0).unwrap().dropping_sentinels();
    let subset = table.subset_by_condition(1, &cond).unwrap();
    assert_eq!(subset.nrow(), 1);
    assert_eq!(subset.get(0, 1).unwrap(), &Cell::Double(3.0));
    assert_eq!(table.complete_cases().nrow(), 2);
}

// =============================================================================
// MATRICES
// =============================================================================

#[test]
fn test_matrix_multiply_conformable() {
    let a = grid(&[&[1, 2, 3], &[4, 5, 6]]);
    let b = grid(&[&[1, 0], &[2, 1], &[0, 3]]);
    let product = Matrix::multiply(&a, &b).unwrap();
    assert_eq!(product.nrow(), 2);
    let expected = a.rows()[0]
        .to_column()
        .unwrap()
        .inner_product(&b.columns()[0])
        .unwrap();
    assert_eq!(product.get(0, 0).unwrap(), &Cell::from(expected));
    assert_eq!(product.get(0, 0).unwrap(), &Cell::Integer(5));
}

#[test]
fn test_matrix_multiply_non_conformable() {
    let a = grid(&[&[1, 2, 3], &[4, 5, 6]]);
    let b = grid(&[&[1, 2], &[3, 4]]);
    assert!(matches!(
        Matrix::multiply(&a, &b),
        Err(TableError::MatrixViability(_))
    ));
}

#[test]
fn test_impute_simple_uses_column_mean() {
    let column =
        Column::from_cells("c", vec![Cell::Integer(1), Cell::Missing, Cell::Integer(3)]).unwrap();
    let mut matrix = Matrix::from_columns("m", vec![column]).unwrap();
    matrix.impute_simple().unwrap();
    assert_eq!(matrix.get(1, 0).unwrap(), &Cell::Double(2.0));
    assert_eq!(matrix.columns()[0].content_kind(), Some(Kind::Double));
}

// =============================================================================
// RE-TYPING
// =============================================================================

#[test]
fn test_autobox_text_records() {
    let mut table = Table::from_text_records(
        "raw",
        vec![vec!["1", "2.5", "a"], vec!["NA", "3", "b"], vec!["4", "Inf", "c"]],
    )
    .unwrap();
    assert_eq!(table.autobox(), 2);
    assert!(!table.has_exceptions());
    assert_eq!(table.columns()[0].content_kind(), Some(Kind::Integer));
    assert_eq!(table.columns()[1].content_kind(), Some(Kind::Double));
    assert_eq!(table.columns()[2].content_kind(), Some(Kind::Text));
    assert_eq!(table.get(1, 0).unwrap(), &Cell::Missing);
    assert_eq!(table.get(2, 1).unwrap(), &Cell::Infinite(Sign::Positive));
    assert_eq!(table.rows()[0].cells()[1], Cell::Double(2.5));
}

#[test]
fn test_transform_to_common_kind() {
    let mut table = Table::from_columns(
        "t",
        vec![
            Column::from_values("a", [1i64, 2]).unwrap(),
            Column::from_values("b", [0.5f64, 1.5]).unwrap(),
        ],
    )
    .unwrap();
    assert_eq!(table.common_kind(), Some(Kind::Double));
    table.transform().unwrap();
    assert_eq!(table.get(1, 0).unwrap(), &Cell::Double(2.0));
    assert_eq!(table.rows()[1].cells()[0], Cell::Double(2.0));
}

#[test]
fn test_sort_places_missing_per_policy() {
    let mut table = scores();
    table.sort_ascending(1, MissingOrder::Low).unwrap();
    assert_eq!(table.get(0, 1).unwrap(), &Cell::Missing);
    table.sort_ascending(1, MissingOrder::High).unwrap();
    assert_eq!(table.get(2, 1).unwrap(), &Cell::Missing);
    assert_eq!(table.get(2, 0).unwrap(), &Cell::Integer(2));
}

// =============================================================================
// Overflowing doubles
// =============================================================================

#[test]
fn test_overflowing_token_becomes_infinite_sentinel() -> anyhow::Result<()> {
    let mut table = Table::from_text_records("t", vec![vec!["1.5"], vec!["1e400"], vec!["-1e400"]])?;
    assert_eq!(table.autobox(), 1);
    assert_eq!(table.get(1, 0)?, &Cell::Infinite(Sign::Positive));
    assert_eq!(table.get(2, 0)?, &Cell::Infinite(Sign::Negative));
    assert_eq!(table.rows()[1].cells()[0], Cell::Infinite(Sign::Positive));

    let json = serde_json::to_string(&table)?;
    let restored: Table = serde_json::from_str(&json)?;
    assert_eq!(restored.columns()[0].cells(), table.columns()[0].cells());
    Ok(())
}

#[test]
fn test_non_finite_doubles_pushed_as_sentinels() -> anyhow::Result<()> {
    let mut column = Column::new("c");
    column.push(f64::INFINITY)?;
    column.push(Cell::Double(f64::NEG_INFINITY))?;
    column.push(f64::NAN)?;
    column.push(2.5)?;
    assert_eq!(
        column.cells(),
        &[
            Cell::Infinite(Sign::Positive),
            Cell::Infinite(Sign::Negative),
            Cell::Missing,
            Cell::Double(2.5),
        ]
    );
    Ok(())
}
