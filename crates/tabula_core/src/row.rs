//! Heterogeneous, positionally typed rows.

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Kind};
use crate::column::{unique_cells, Column};
use crate::error::{Result, TableError};
use crate::inference::{is_double_shaped, is_integer_shaped};
use crate::schema::Schema;

/// Name given to rows created without one.
pub const DEFAULT_ROW_NAME: &str = "DataRow";

/// An ordered sequence of cells plus a name and its own schema.
///
/// The schema starts as the kinds of the cells and only moves from sentinel
/// to concrete kinds, either when a concrete cell is set at a sentinel
/// position or when a table pushes its authoritative schema down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    name: String,
    cells: Vec<Cell>,
    schema: Schema,
}

impl Default for Row {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_NAME)
    }
}

impl Row {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_cells(name, Vec::new())
    }

    pub fn from_cells(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let cells: Vec<Cell> = cells.into_iter().map(Cell::normalize).collect();
        let schema = Schema::of_cells(&cells);
        let mut row = Self {
            name: String::new(),
            cells,
            schema,
        };
        row.set_name(name);
        row
    }

    pub fn from_values<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cell>,
    {
        Self::from_cells(name, values.into_iter().map(Into::into).collect())
    }

    pub(crate) fn from_parts(name: String, cells: Vec<Cell>, schema: Schema) -> Self {
        Self {
            name,
            cells,
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the row. An empty name restores the default.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.is_empty() {
            DEFAULT_ROW_NAME.to_string()
        } else {
            name
        };
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn push(&mut self, cell: impl Into<Cell>) {
        let cell = Cell::normalize(cell.into());
        self.schema.push(cell.kind());
        self.cells.push(cell);
    }

    pub fn insert(&mut self, index: usize, cell: impl Into<Cell>) -> Result<()> {
        if index > self.len() {
            return Err(TableError::out_of_bounds(index, self.len()));
        }
        let cell = Cell::normalize(cell.into());
        self.schema.insert(index, cell.kind());
        self.cells.insert(index, cell);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Cell> {
        if index >= self.len() {
            return Err(TableError::out_of_bounds(index, self.len()));
        }
        self.schema.remove(index);
        Ok(self.cells.remove(index))
    }

    /// Check that `cell` may replace the cell at `index`.
    pub fn check_at(&self, index: usize, cell: &Cell) -> Result<()> {
        let mut probe = self.schema.clone();
        probe.reconcile_at(index, cell.kind())
    }

    /// Replace the cell at `index`, keeping position kinds compatible.
    pub fn set(&mut self, index: usize, cell: impl Into<Cell>) -> Result<Cell> {
        let cell = Cell::normalize(cell.into());
        self.schema.reconcile_at(index, cell.kind())?;
        Ok(std::mem::replace(&mut self.cells[index], cell))
    }

    pub(crate) fn set_trusted(&mut self, index: usize, cell: Cell, kind: Kind) -> Cell {
        self.schema.set(index, kind);
        std::mem::replace(&mut self.cells[index], cell)
    }

    /// Merge a table's schema into this row's, upgrading sentinel positions.
    pub(crate) fn adopt_schema(&mut self, schema: &Schema) -> Result<()> {
        self.schema.reconcile(schema)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.schema = Schema::default();
    }

    pub fn contains_sentinel(&self) -> bool {
        self.cells.iter().any(Cell::is_sentinel)
    }

    pub fn count_missing_values(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Distinct cells in order of first appearance.
    pub fn unique(&self) -> Vec<Cell> {
        unique_cells(&self.cells)
    }

    /// Convert to a column.
    ///
    /// A singular row converts as is. A mixed row whose ordinary cells are
    /// all numeric-shaped is first coerced to double when any of them is
    /// double-shaped, integer otherwise. Anything else is a schema mismatch.
    pub fn to_column(&self) -> Result<Column> {
        if self.schema.is_singular() {
            return Column::from_cells(self.name.clone(), self.cells.clone());
        }
        let ordinary: Vec<&Cell> = self.cells.iter().filter(|c| !c.is_sentinel()).collect();
        if !ordinary.iter().all(|c| c.numeric_value().is_some()) {
            return Err(TableError::schema_mismatch(format!(
                "row '{}' mixes kinds {} and cannot become a column",
                self.name, self.schema
            )));
        }
        let double = ordinary.iter().any(|c| match c {
            Cell::Double(_) => true,
            Cell::Text(t) => is_double_shaped(t) && !is_integer_shaped(t),
            _ => false,
        });
        let column = Column::from_trusted(self.name.clone(), self.cells.clone(), None);
        if double {
            column.as_double()
        } else {
            column.as_integer()
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::Sign;

    #[test]
    fn test_schema_tracks_cells() {
        let mut row = Row::from_values("r", [Cell::Integer(1), Cell::from("a")]);
        row.push(Cell::Missing);
        assert_eq!(row.schema().kinds(), &[Kind::Integer, Kind::Text, Kind::Missing]);
        row.remove(1).unwrap();
        assert_eq!(row.schema().kinds(), &[Kind::Integer, Kind::Missing]);
    }

    #[test]
    fn test_set_respects_position_kind() {
        let mut row = Row::from_values("r", [Cell::Integer(1), Cell::Missing]);
        assert!(matches!(row.set(0, "x"), Err(TableError::SchemaMismatch(_))));
        row.set(1, 2.5).unwrap();
        assert_eq!(row.schema().kinds(), &[Kind::Integer, Kind::Double]);
        row.set(1, Cell::Missing).unwrap();
        assert_eq!(row.schema().kinds(), &[Kind::Integer, Kind::Double]);
        assert!(row.set(1, 1).is_err());
    }

    #[test]
    fn test_to_column_singular() {
        let row = Row::from_values("r", [Cell::from("a"), Cell::Missing, Cell::from("b")]);
        let col = row.to_column().unwrap();
        assert_eq!(col.name(), "r");
        assert_eq!(col.content_kind(), Some(Kind::Text));
    }

    #[test]
    fn test_to_column_coerces_numeric_mix() {
        let row = Row::from_values("r", [Cell::Integer(1), Cell::from("2"), Cell::Missing]);
        let col = row.to_column().unwrap();
        assert_eq!(col.cells(), &[Cell::Integer(1), Cell::Integer(2), Cell::Missing]);

        let row = Row::from_values("r", [Cell::Integer(1), Cell::Double(2.5)]);
        let col = row.to_column().unwrap();
        assert_eq!(col.cells(), &[Cell::Double(1.0), Cell::Double(2.5)]);
    }

    #[test]
    fn test_to_column_rejects_mixed_text() {
        let row = Row::from_values("r", [Cell::Integer(1), Cell::from("x")]);
        assert!(matches!(row.to_column(), Err(TableError::SchemaMismatch(_))));
    }

    #[test]
    fn test_sentinel_counts() {
        let row = Row::from_values(
            "r",
            [Cell::Missing, Cell::Infinite(Sign::Positive), Cell::from("NA")],
        );
        assert!(row.contains_sentinel());
        assert_eq!(row.count_missing_values(), 2);
        assert_eq!(row.unique().len(), 2);
    }

    #[test]
    fn test_default_name() {
        assert_eq!(Row::default().name(), DEFAULT_ROW_NAME);
    }
}
