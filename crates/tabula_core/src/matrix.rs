//! Numeric-only tables with linear algebra.
//!
//! A [`Matrix`] dereferences to its [`Table`] for every read. All writes go
//! through the matrix so that each added or replaced cell is checked for
//! numeric content first.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell::{Cell, Kind, Number};
use crate::column::Column;
use crate::error::{Result, TableError};
use crate::options::TableOptions;
use crate::row::Row;
use crate::sentinel::MissingOrder;
use crate::table::{Table, DEFAULT_TABLE_NAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    table: Table,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_NAME)
    }
}

impl Deref for Matrix {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.table
    }
}

fn ensure_numeric_cell(cell: &Cell) -> Result<()> {
    if matches!(
        cell,
        Cell::Integer(_) | Cell::Double(_) | Cell::Missing | Cell::Infinite(_)
    ) {
        Ok(())
    } else {
        Err(TableError::matrix_viability(format!(
            "matrix cells must be numeric, got {} '{}'",
            cell.kind(),
            cell
        )))
    }
}

fn ensure_numeric_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Result<()> {
    cells.into_iter().try_for_each(ensure_numeric_cell)
}

/// Text spelling a sentinel becomes the typed sentinel.
fn typed_sentinel(cell: Cell) -> Cell {
    match (&cell, cell.sentinel()) {
        (Cell::Text(_), Some(sentinel)) => sentinel.into(),
        _ => cell,
    }
}

impl Matrix {
    /// An empty matrix. Column and table names are not printed by default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: Table::with_options(name, TableOptions::matrix()),
        }
    }

    /// Wrap a table whose every cell is numeric or a sentinel. Sentinel
    /// tokens left as text are typed on the way in.
    pub fn from_table(mut table: Table) -> Result<Self> {
        for index in 0..table.ncol() {
            let column = &table.columns()[index];
            if column.iter().any(|c| matches!(c, Cell::Text(_)) && c.is_sentinel()) {
                let cells = column.iter().cloned().map(typed_sentinel).collect();
                let typed = Column::from_cells(column.name(), cells)?;
                table.set_column(index, typed)?;
            }
        }
        for column in table.columns() {
            ensure_numeric_cells(column)?;
        }
        table.set_option("print.col.names", 0)?;
        table.set_option("print.table.name", 0)?;
        Ok(Self { table })
    }

    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let mut matrix = Self::new(name);
        for column in columns {
            matrix.add_column(column)?;
        }
        Ok(matrix)
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Result<Self> {
        let mut matrix = Self::new(name);
        for row in rows {
            matrix.add_row(row)?;
        }
        Ok(matrix)
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    /// Confirm every cell is an integer, a double or a typed sentinel.
    pub fn check_cells(&self) -> Result<()> {
        for column in self.table.columns() {
            ensure_numeric_cells(column)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Checked writes
    // ------------------------------------------------------------------

    pub fn add_row(&mut self, row: Row) -> Result<()> {
        ensure_numeric_cells(&row)?;
        self.table.add_row(row)
    }

    pub fn insert_row(&mut self, index: usize, row: Row) -> Result<()> {
        ensure_numeric_cells(&row)?;
        self.table.insert_row(index, row)
    }

    pub fn add_column(&mut self, column: Column) -> Result<()> {
        ensure_numeric_cells(&column)?;
        self.table.add_column(column)
    }

    pub fn insert_column(&mut self, index: usize, column: Column) -> Result<()> {
        ensure_numeric_cells(&column)?;
        self.table.insert_column(index, column)
    }

    pub fn set(&mut self, row: usize, col: usize, cell: impl Into<Cell>) -> Result<Cell> {
        let cell = typed_sentinel(cell.into());
        ensure_numeric_cell(&cell)?;
        self.table.set(row, col, cell)
    }

    pub fn set_row(&mut self, index: usize, row: Row) -> Result<Row> {
        ensure_numeric_cells(&row)?;
        self.table.set_row(index, row)
    }

    pub fn set_column(&mut self, index: usize, column: Column) -> Result<Column> {
        ensure_numeric_cells(&column)?;
        self.table.set_column(index, column)
    }

    // ------------------------------------------------------------------
    // Writes that cannot introduce non-numeric content
    // ------------------------------------------------------------------

    pub fn remove_row(&mut self, index: usize) -> Result<Row> {
        self.table.remove_row(index)
    }

    pub fn remove_column(&mut self, index: usize) -> Result<Column> {
        self.table.remove_column(index)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.table.set_name(name);
    }

    pub fn set_option(&mut self, name: &str, value: usize) -> Result<()> {
        self.table.set_option(name, value)
    }

    pub fn set_column_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table.set_column_names(names)
    }

    pub fn set_row_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table.set_row_names(names)
    }

    pub fn sort_ascending(&mut self, col: usize, order: MissingOrder) -> Result<()> {
        self.table.sort_ascending(col, order)
    }

    pub fn sort_descending(&mut self, col: usize, order: MissingOrder) -> Result<()> {
        self.table.sort_descending(col, order)
    }

    pub fn render_state(&mut self) -> Result<()> {
        self.table.render_state()
    }

    // ------------------------------------------------------------------
    // Linear algebra
    // ------------------------------------------------------------------

    /// `n x n` integer identity. `n < 2` is rejected.
    pub fn identity(n: usize) -> Result<Matrix> {
        if n < 2 {
            return Err(TableError::matrix_viability(format!(
                "identity matrix needs at least 2 dimensions, got {}",
                n
            )));
        }
        let columns = (0..n)
            .map(|j| {
                Column::from_values(
                    format!("Col{}", j + 1),
                    (0..n).map(|i| i64::from(i == j)),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Matrix::from_columns("Identity", columns)
    }

    /// Standard product `a * b`.
    ///
    /// Requires `a.ncol() == b.nrow()` and no sentinel in either operand.
    /// The result has `b.ncol()` columns named `Col1..ColN`, each of length
    /// `a.nrow()`, and keeps `a`'s row names. Cells are double when either
    /// operand holds a double column, integer otherwise.
    pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        if a.is_empty() || b.is_empty() {
            return Err(TableError::matrix_viability("cannot multiply an empty matrix"));
        }
        if a.ncol() != b.nrow() {
            return Err(TableError::matrix_viability(format!(
                "non-conformable operands: {}x{} times {}x{}",
                a.nrow(),
                a.ncol(),
                b.nrow(),
                b.ncol()
            )));
        }
        if a.contains_sentinel() || b.contains_sentinel() {
            return Err(TableError::matrix_viability(
                "cannot multiply matrices that hold NA or infinite values",
            ));
        }
        let double = a
            .columns()
            .iter()
            .chain(b.columns())
            .any(|c| c.content_kind() == Some(Kind::Double));
        let kind = if double { Kind::Double } else { Kind::Integer };

        let left_rows = a
            .rows()
            .iter()
            .map(Row::to_column)
            .collect::<Result<Vec<_>>>()?;
        let mut columns = Vec::with_capacity(b.ncol());
        for (k, right) in b.columns().iter().enumerate() {
            let cells = left_rows
                .iter()
                .map(|left| {
                    left.inner_product(right)
                        .map(|n| Cell::from(Number::from_f64(kind, n.as_f64())))
                })
                .collect::<Result<Vec<_>>>()?;
            columns.push(Column::from_cells(format!("Col{}", k + 1), cells)?);
        }
        let mut product = Matrix::from_columns(DEFAULT_TABLE_NAME, columns)?;
        product.set_row_names(a.row_names())?;
        debug!(
            rows = product.nrow(),
            cols = product.ncol(),
            "multiplied matrices"
        );
        Ok(product)
    }

    /// Turn every row into a column, in place. Row names become column
    /// names and column names become row names.
    pub fn transpose(&mut self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let column_names = self.column_names();
        let columns = self
            .rows()
            .iter()
            .map(Row::to_column)
            .collect::<Result<Vec<_>>>()?;
        let mut table = Table::with_options(self.name(), self.options().clone());
        for column in columns {
            table.add_column(column)?;
        }
        table.set_row_names(column_names)?;
        table.render_state()?;
        self.table = table;
        debug!(
            matrix = %self.name(),
            rows = self.nrow(),
            cols = self.ncol(),
            "transposed matrix"
        );
        Ok(())
    }

    /// Replace every sentinel with the mean of its column, in place.
    ///
    /// Columns holding a sentinel are promoted to double first. Fails
    /// without changes when such a column has no ordinary values.
    pub fn impute_simple(&mut self) -> Result<&mut Self> {
        let mut replacements = Vec::new();
        for (index, column) in self.columns().iter().enumerate() {
            if !column.contains_sentinel() {
                continue;
            }
            let mean = column.mean()?;
            let mut filled = column.as_double()?;
            for (row, cell) in column.cells().iter().enumerate() {
                if cell.is_sentinel() {
                    filled.set_trusted(row, Cell::Double(mean));
                }
            }
            replacements.push((index, filled));
        }
        for (index, column) in replacements {
            self.table.set_column(index, column)?;
        }
        Ok(self)
    }

    pub fn is_square(&self) -> bool {
        self.nrow() == self.ncol()
    }

    /// Square, non-zero on the diagonal and zero everywhere else.
    pub fn is_diagonal(&self) -> bool {
        if !self.is_square() || self.is_empty() {
            return false;
        }
        self.columns().iter().enumerate().all(|(j, column)| {
            column.cells().iter().enumerate().all(|(i, cell)| {
                match (cell.is_sentinel(), cell.numeric_value()) {
                    (false, Some(v)) if i == j => v != 0.0,
                    (false, Some(v)) => v == 0.0,
                    _ => false,
                }
            })
        })
    }

    /// Standardize every column into a new matrix of doubles.
    pub fn standardize(&self) -> Result<Matrix> {
        let columns = self
            .columns()
            .iter()
            .map(Column::standardize)
            .collect::<Result<Vec<_>>>()?;
        let mut standardized = Matrix::from_columns(self.name(), columns)?;
        standardized.set_row_names(self.row_names())?;
        Ok(standardized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::Sign;

    fn matrix(rows: &[&[i64]]) -> Matrix {
        Matrix::from_rows(
            "m",
            rows.iter()
                .map(|r| Row::from_values("r", r.iter().copied()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_non_numeric() {
        let mut m = matrix(&[&[1, 2]]);
        assert!(matches!(
            m.add_row(Row::from_values("r", [Cell::Integer(1), Cell::from("x")])),
            Err(TableError::MatrixViability(_))
        ));
        assert!(matches!(
            m.set(0, 0, "x"),
            Err(TableError::MatrixViability(_))
        ));
        m.add_row(Row::from_values("r", [Cell::Missing, Cell::Integer(4)]))
            .unwrap();
        assert_eq!(m.nrow(), 2);
    }

    #[test]
    fn test_sentinel_text_never_stored_as_text() {
        let mut m = matrix(&[&[1, 2]]);
        assert!(matches!(
            m.add_row(Row::from_values("r", [Cell::from("NA"), Cell::from("inf")])),
            Err(TableError::MatrixViability(_))
        ));
        m.set(0, 1, "NA").unwrap();
        assert_eq!(m.get(0, 1).unwrap(), &Cell::Missing);
        assert!(m.check_cells().is_ok());
    }

    #[test]
    fn test_from_table_types_sentinel_text() {
        let mut table =
            Table::from_text_records("t", vec![vec!["1", "NA"], vec!["2", "Inf"]]).unwrap();
        table.convert_column_to_numeric(0).unwrap();
        let m = Matrix::from_table(table).unwrap();
        assert_eq!(m.get(0, 1).unwrap(), &Cell::Missing);
        assert_eq!(m.get(1, 1).unwrap(), &Cell::Infinite(Sign::Positive));
        assert!(m.check_cells().is_ok());
    }

    #[test]
    fn test_print_names_off_by_default() {
        let m = Matrix::new("m");
        assert_eq!(m.option("print.col.names"), Some(0));
        assert_eq!(m.option("print.table.name"), Some(0));
    }

    #[test]
    fn test_multiply_standard_product() {
        let a = matrix(&[&[1, 2, 3], &[4, 5, 6]]);
        let b = matrix(&[&[7, 8], &[9, 10], &[11, 12]]);
        let p = Matrix::multiply(&a, &b).unwrap();
        assert_eq!(p.nrow(), 2);
        assert_eq!(p.ncol(), 2);
        assert_eq!(p.column_names(), vec!["Col1", "Col2"]);
        assert_eq!(p.get(0, 0).unwrap(), &Cell::Integer(58));
        assert_eq!(p.get(0, 1).unwrap(), &Cell::Integer(64));
        assert_eq!(p.get(1, 0).unwrap(), &Cell::Integer(139));
        assert_eq!(p.get(1, 1).unwrap(), &Cell::Integer(154));
    }

    #[test]
    fn test_multiply_rejects_bad_shapes_and_sentinels() {
        let a = matrix(&[&[1, 2, 3], &[4, 5, 6]]);
        let b = matrix(&[&[1, 2], &[3, 4]]);
        assert!(matches!(
            Matrix::multiply(&a, &b),
            Err(TableError::MatrixViability(_))
        ));
        let mut c = matrix(&[&[1, 2], &[3, 4], &[5, 6]]);
        c.set(0, 0, Cell::Missing).unwrap();
        assert!(matches!(
            Matrix::multiply(&a, &c),
            Err(TableError::MatrixViability(_))
        ));
    }

    #[test]
    fn test_identity() {
        let id = Matrix::identity(3).unwrap();
        assert!(id.is_square());
        assert!(id.is_diagonal());
        assert_eq!(id.get(1, 1).unwrap(), &Cell::Integer(1));
        assert_eq!(id.get(0, 2).unwrap(), &Cell::Integer(0));
        assert!(Matrix::identity(1).is_err());

        let a = matrix(&[&[1, 2], &[3, 4]]);
        let same = Matrix::multiply(&a, &Matrix::identity(2).unwrap()).unwrap();
        assert_eq!(same.columns()[1].cells(), a.columns()[1].cells());
        assert!(!a.is_diagonal());
    }

    #[test]
    fn test_transpose_swaps_names() {
        let mut m = matrix(&[&[1, 2, 3], &[4, 5, 6]]);
        m.set_row_names(["a", "b"]).unwrap();
        m.set_column_names(["x", "y", "z"]).unwrap();
        m.transpose().unwrap();
        assert_eq!(m.nrow(), 3);
        assert_eq!(m.ncol(), 2);
        assert_eq!(m.column_names(), vec!["a", "b"]);
        assert_eq!(m.row_names(), vec!["x", "y", "z"]);
        assert_eq!(m.get(2, 1).unwrap(), &Cell::Integer(6));
    }

    #[test]
    fn test_impute_simple_fills_column_mean() {
        let column = Column::from_cells(
            "c",
            vec![Cell::Integer(1), Cell::Missing, Cell::Integer(3)],
        )
        .unwrap();
        let mut m = Matrix::from_columns("m", vec![column]).unwrap();
        m.impute_simple().unwrap();
        assert_eq!(
            m.columns()[0].cells(),
            &[Cell::Double(1.0), Cell::Double(2.0), Cell::Double(3.0)]
        );
        assert_eq!(m.rows()[1].cells()[0], Cell::Double(2.0));
        assert!(!m.contains_sentinel());
    }

    #[test]
    fn test_impute_fails_on_all_sentinel_column() {
        let column =
            Column::from_cells("c", vec![Cell::Missing, Cell::Infinite(Sign::Negative)]).unwrap();
        let mut m = Matrix::from_columns("m", vec![column]).unwrap();
        assert!(matches!(
            m.impute_simple(),
            Err(TableError::MissingValue(_))
        ));
    }

    #[test]
    fn test_standardize_columns() {
        let m = matrix(&[&[1, 10], &[3, 30]]);
        let s = m.standardize().unwrap();
        let sd = 2f64.sqrt();
        assert_eq!(s.get(0, 0).unwrap(), &Cell::Double(-1.0 / sd));
        assert_eq!(s.get(1, 1).unwrap(), &Cell::Double(10.0 / (200f64).sqrt()));
    }

    #[test]
    fn test_from_table_checks_content() {
        let text = Table::from_text_records("t", vec![vec!["1"]]).unwrap();
        assert!(matches!(
            Matrix::from_table(text),
            Err(TableError::MatrixViability(_))
        ));
    }
}
