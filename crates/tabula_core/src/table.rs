//! The table: columns and rows kept in lockstep over one cell grid.
//!
//! Every cell lives twice, once in its column and once in its row. All
//! mutations validate first and commit second, so a failed call leaves both
//! views exactly as they were.
//!
//! # Bootstrapping
//!
//! An empty table has no shape. The first row added fabricates one column
//! per cell ([`Table::add_row`]); the first column added fabricates one row
//! per cell ([`Table::add_column`]). After that, rows must match the column
//! count and columns must match the row count.
//!
//! # Schema
//!
//! The table schema holds one kind per column. Sentinel positions are
//! upgraded when a concrete value first arrives; concrete positions never
//! change except through an explicit cast.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cell::{Cell, Kind};
use crate::column::{Column, DEFAULT_COLUMN_NAME};
use crate::condition::Condition;
use crate::error::{Result, TableError};
use crate::inference::common_kind;
use crate::options::TableOptions;
use crate::row::{Row, DEFAULT_ROW_NAME};
use crate::schema::Schema;
use crate::sentinel::MissingOrder;

/// Name given to tables created without one.
pub const DEFAULT_TABLE_NAME: &str = "New Table";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
    schema: Option<Schema>,
    options: TableOptions,
    /// Failures diverted during autoboxing
    #[serde(skip)]
    exceptions: Vec<TableError>,
    /// Set by `render_state`, cleared by any mutation
    #[serde(skip)]
    rendered: bool,
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.columns == other.columns
            && self.rows == other.rows
            && self.schema == other.schema
            && self.options == other.options
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_NAME)
    }
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, TableOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: TableOptions) -> Self {
        let mut table = Self {
            name: String::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            schema: None,
            options,
            exceptions: Vec::new(),
            rendered: false,
        };
        table.set_name(name);
        table
    }

    /// Build a table column by column.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new(name);
        for column in columns {
            table.add_column(column)?;
        }
        Ok(table)
    }

    /// Build a table row by row.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(name);
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// Bulk ingestion of raw text records.
    ///
    /// Every cell is kept as text and every row carries the same all-text
    /// schema prototype, so no per-cell kind checks run. Only the record
    /// widths are checked. Call [`Table::autobox`] afterwards to cast eligible
    /// columns to numeric kinds.
    pub fn from_text_records<I, R, S>(name: impl Into<String>, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(name);
        let mut prototype: Option<Schema> = None;
        for record in records {
            let cells: Vec<Cell> = record.into_iter().map(|s| Cell::Text(s.into())).collect();
            let schema = prototype.get_or_insert_with(|| vec![Kind::Text; cells.len()].into());
            if cells.len() != schema.len() {
                return Err(TableError::dimension_mismatch(schema.len(), cells.len()));
            }
            table
                .rows
                .push(Row::from_parts(DEFAULT_ROW_NAME.to_string(), cells, schema.clone()));
        }
        let Some(schema) = prototype else {
            return Ok(table);
        };
        table.columns = (0..schema.len())
            .map(|c| {
                let cells = table.rows.iter().map(|r| r.cells()[c].clone()).collect();
                Column::from_trusted(DEFAULT_COLUMN_NAME, cells, Some(Kind::Text))
            })
            .collect();
        if schema.is_empty() {
            table.rows.clear();
        } else {
            table.schema = Some(schema);
        }
        debug!(
            table = %table.name,
            rows = table.nrow(),
            cols = table.ncol(),
            "ingested text records"
        );
        Ok(table)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the table. An empty name restores the default.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.is_empty() {
            DEFAULT_TABLE_NAME.to_string()
        } else {
            name
        };
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<usize> {
        self.options.get(name)
    }

    pub fn set_option(&mut self, name: &str, value: usize) -> Result<()> {
        self.options.set(name, value)
    }

    pub fn nrow(&self) -> usize {
        self.rows.len()
    }

    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// No columns (and therefore no rows).
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column(&self, index: usize) -> Result<&Column> {
        self.columns
            .get(index)
            .ok_or_else(|| TableError::out_of_bounds(index, self.ncol()))
    }

    pub fn row(&self, index: usize) -> Result<&Row> {
        self.rows
            .get(index)
            .ok_or_else(|| TableError::out_of_bounds(index, self.nrow()))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn row_index(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.name() == name)
    }

    pub fn column_by_name(&self, name: &str) -> Result<&Column> {
        self.column_index(name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&Cell> {
        self.row(row)?
            .get(col)
            .ok_or_else(|| TableError::out_of_bounds(col, self.ncol()))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn row_names(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.name().to_string()).collect()
    }

    /// Name the leading columns. More names than columns is rejected.
    pub fn set_column_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > self.ncol() {
            return Err(TableError::invalid_argument(format!(
                "{} column names for {} columns",
                names.len(),
                self.ncol()
            )));
        }
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.set_name(name);
        }
        self.touch();
        Ok(())
    }

    /// Name the leading rows. More names than rows is rejected.
    pub fn set_row_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() > self.nrow() {
            return Err(TableError::invalid_argument(format!(
                "{} row names for {} rows",
                names.len(),
                self.nrow()
            )));
        }
        for (row, name) in self.rows.iter_mut().zip(names) {
            row.set_name(name);
        }
        self.touch();
        Ok(())
    }

    pub fn contains_sentinel(&self) -> bool {
        self.columns.iter().any(Column::contains_sentinel)
    }

    pub fn count_missing_values(&self) -> usize {
        self.columns.iter().map(Column::count_missing_values).sum()
    }

    /// Conversion failures recorded by [`Table::autobox`].
    pub fn exception_log(&self) -> &[TableError] {
        &self.exceptions
    }

    pub fn has_exceptions(&self) -> bool {
        !self.exceptions.is_empty()
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    fn touch(&mut self) {
        self.rendered = false;
    }

    // ------------------------------------------------------------------
    // Adding
    // ------------------------------------------------------------------

    /// Schema the table would have after admitting `row`.
    fn admit_row(&self, row: &Row) -> Result<Schema> {
        if row.len() != self.ncol() {
            return Err(TableError::dimension_mismatch(self.ncol(), row.len()));
        }
        let mut schema = self.schema.clone().unwrap_or_else(|| self.columns_schema());
        schema.reconcile(row.schema()).map_err(|err| match err {
            TableError::SchemaMismatch(msg) => {
                TableError::schema_mismatch(format!("row '{}': {}", row.name(), msg))
            }
            other => other,
        })?;
        for (column, cell) in self.columns.iter().zip(row.cells()) {
            column.check(cell)?;
        }
        Ok(schema)
    }

    fn columns_schema(&self) -> Schema {
        self.columns.iter().map(Column::schema_kind).collect()
    }

    /// Empty table: one column per cell of the first row.
    fn seed_from_row(&mut self, row: Row) -> Result<()> {
        if row.is_empty() {
            return Err(TableError::InvalidShape(
                "an empty row cannot shape an empty table".to_string(),
            ));
        }
        self.columns = row
            .cells()
            .iter()
            .map(|cell| Column::from_trusted(DEFAULT_COLUMN_NAME, vec![cell.clone()], None))
            .collect();
        self.schema = Some(row.schema().clone());
        self.rows = vec![row];
        Ok(())
    }

    /// Empty table: one row per cell of the first column.
    fn seed_from_column(&mut self, column: Column) {
        self.rows = column
            .cells()
            .iter()
            .map(|cell| Row::from_cells(DEFAULT_ROW_NAME, vec![cell.clone()]))
            .collect();
        self.schema = Some(Schema::new(vec![column.schema_kind()]));
        self.columns = vec![column];
    }

    pub fn add_row(&mut self, row: Row) -> Result<()> {
        self.touch();
        if self.is_empty() {
            return self.seed_from_row(row);
        }
        let schema = self.admit_row(&row)?;
        for (column, cell) in self.columns.iter_mut().zip(row.cells()) {
            column.push_trusted(cell.clone());
        }
        self.rows.push(row);
        self.schema = Some(schema);
        Ok(())
    }

    /// Insert a row at `index`.
    ///
    /// Appending (or inserting into an empty table) behaves like
    /// [`Table::add_row`]. An index past the end would need sentinel-filled
    /// rows in between and is rejected as an invalid shape.
    pub fn insert_row(&mut self, index: usize, row: Row) -> Result<()> {
        if self.is_empty() || self.schema.is_none() || index == self.nrow() {
            return self.add_row(row);
        }
        if index > self.nrow() {
            return Err(TableError::InvalidShape(format!(
                "row index {} is past the end of {} rows",
                index,
                self.nrow()
            )));
        }
        self.touch();
        let schema = self.admit_row(&row)?;
        for (column, cell) in self.columns.iter_mut().zip(row.cells()) {
            column.insert_trusted(index, cell.clone());
        }
        self.rows.insert(index, row);
        self.schema = Some(schema);
        Ok(())
    }

    pub fn add_column(&mut self, column: Column) -> Result<()> {
        self.touch();
        if self.is_empty() {
            self.seed_from_column(column);
            return Ok(());
        }
        if column.len() != self.nrow() {
            return Err(TableError::dimension_mismatch(self.nrow(), column.len()));
        }
        for (row, cell) in self.rows.iter_mut().zip(column.cells()) {
            row.push(cell.clone());
        }
        let kind = column.schema_kind();
        self.schema.get_or_insert_with(Schema::default).push(kind);
        self.columns.push(column);
        Ok(())
    }

    /// Insert a column at `index`; see [`Table::insert_row`] for the rules.
    pub fn insert_column(&mut self, index: usize, column: Column) -> Result<()> {
        if self.is_empty() || self.schema.is_none() || index == self.ncol() {
            return self.add_column(column);
        }
        if index > self.ncol() {
            return Err(TableError::InvalidShape(format!(
                "column index {} is past the end of {} columns",
                index,
                self.ncol()
            )));
        }
        if column.len() != self.nrow() {
            return Err(TableError::dimension_mismatch(self.nrow(), column.len()));
        }
        self.touch();
        for (row, cell) in self.rows.iter_mut().zip(column.cells()) {
            row.insert(index, cell.clone())?;
        }
        let kind = column.schema_kind();
        if let Some(schema) = self.schema.as_mut() {
            schema.insert(index, kind);
        }
        self.columns.insert(index, column);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Removing
    // ------------------------------------------------------------------

    /// Drop every row and column and forget the schema. Name and options
    /// stay.
    pub fn clear(&mut self) {
        self.columns.clear();
        self.rows.clear();
        self.schema = None;
        self.touch();
    }

    /// Remove a column. Removing the last one clears the table.
    pub fn remove_column(&mut self, index: usize) -> Result<Column> {
        if index >= self.ncol() {
            return Err(TableError::out_of_bounds(index, self.ncol()));
        }
        self.touch();
        if self.ncol() == 1 {
            let column = self.columns.remove(0);
            self.clear();
            return Ok(column);
        }
        for row in &mut self.rows {
            row.remove(index)?;
        }
        if let Some(schema) = self.schema.as_mut() {
            schema.remove(index);
        }
        Ok(self.columns.remove(index))
    }

    /// Remove a row. Removing the last one clears the table.
    pub fn remove_row(&mut self, index: usize) -> Result<Row> {
        if index >= self.nrow() {
            return Err(TableError::out_of_bounds(index, self.nrow()));
        }
        self.touch();
        if self.nrow() == 1 {
            let row = self.rows.remove(0);
            self.clear();
            return Ok(row);
        }
        for column in &mut self.columns {
            column.remove(index)?;
        }
        Ok(self.rows.remove(index))
    }

    /// Remove columns `start..end`, or `start..=end` when `inclusive`.
    pub fn remove_column_range(&mut self, start: usize, end: usize, inclusive: bool) -> Result<()> {
        let end = checked_range(start, end, inclusive, self.ncol())?;
        if start == 0 && end == self.ncol() {
            self.clear();
            return Ok(());
        }
        for index in (start..end).rev() {
            self.remove_column(index)?;
        }
        Ok(())
    }

    /// Remove rows `start..end`, or `start..=end` when `inclusive`.
    pub fn remove_row_range(&mut self, start: usize, end: usize, inclusive: bool) -> Result<()> {
        let end = checked_range(start, end, inclusive, self.nrow())?;
        if start == 0 && end == self.nrow() {
            self.clear();
            return Ok(());
        }
        for index in (start..end).rev() {
            self.remove_row(index)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Replacing
    // ------------------------------------------------------------------

    /// Replace one cell in both views.
    pub fn set(&mut self, row: usize, col: usize, cell: impl Into<Cell>) -> Result<Cell> {
        let cell = Cell::normalize(cell.into());
        self.get(row, col)?;
        self.columns[col].check(&cell)?;
        self.rows[row].check_at(col, &cell)?;
        let mut schema = self.schema.clone().unwrap_or_else(|| self.columns_schema());
        schema.reconcile_at(col, cell.kind())?;

        self.touch();
        self.columns[col].set_trusted(row, cell.clone());
        let previous = self.rows[row].set(col, cell)?;
        self.schema = Some(schema);
        Ok(previous)
    }

    /// Replace a whole column. Its length must match the row count.
    pub fn set_column(&mut self, index: usize, column: Column) -> Result<Column> {
        if index >= self.ncol() {
            return Err(TableError::out_of_bounds(index, self.ncol()));
        }
        if column.len() != self.nrow() {
            return Err(TableError::dimension_mismatch(self.nrow(), column.len()));
        }
        Ok(self.swap_column(index, column))
    }

    /// Replace a whole row. It must reconcile with the table schema.
    pub fn set_row(&mut self, index: usize, row: Row) -> Result<Row> {
        if index >= self.nrow() {
            return Err(TableError::out_of_bounds(index, self.nrow()));
        }
        let schema = self.admit_row(&row)?;
        self.touch();
        for (column, cell) in self.columns.iter_mut().zip(row.cells()) {
            column.set_trusted(index, cell.clone());
        }
        self.schema = Some(schema);
        Ok(std::mem::replace(&mut self.rows[index], row))
    }

    fn swap_column(&mut self, index: usize, column: Column) -> Column {
        self.touch();
        let kind = column.schema_kind();
        for (row, cell) in self.rows.iter_mut().zip(column.cells()) {
            row.set_trusted(index, cell.clone(), kind);
        }
        if let Some(schema) = self.schema.as_mut() {
            schema.set(index, kind);
        }
        std::mem::replace(&mut self.columns[index], column)
    }

    /// Replace every column and rebuild the rows from them.
    fn replace_columns(&mut self, columns: Vec<Column>) {
        self.touch();
        self.columns = columns;
        self.schema = Some(self.columns_schema());
        let names = self.row_names();
        self.rows = names
            .into_iter()
            .enumerate()
            .map(|(r, name)| {
                let cells = self.columns.iter().map(|c| c.cells()[r].clone()).collect();
                Row::from_cells(name, cells)
            })
            .collect();
    }

    // ------------------------------------------------------------------
    // Sorting and subsetting
    // ------------------------------------------------------------------

    pub fn sort_ascending(&mut self, col: usize, order: MissingOrder) -> Result<()> {
        self.sort_by_column(col, true, order)
    }

    pub fn sort_descending(&mut self, col: usize, order: MissingOrder) -> Result<()> {
        self.sort_by_column(col, false, order)
    }

    /// Reorder every row by one column's sort order.
    ///
    /// The column's stable permutation is applied to the row set and the
    /// columns are rebuilt from the reordered rows. A single-column table
    /// permutes its column directly.
    fn sort_by_column(&mut self, col: usize, ascending: bool, order: MissingOrder) -> Result<()> {
        let permutation = self.column(col)?.ranked_indices(ascending, order);
        if self.nrow() <= 1 {
            return Ok(());
        }
        self.touch();
        self.rows = permutation.iter().map(|&i| self.rows[i].clone()).collect();
        if self.ncol() == 1 {
            self.columns[0].permute(&permutation);
        } else {
            self.columns = self
                .columns
                .iter()
                .enumerate()
                .map(|(c, column)| {
                    let cells = self.rows.iter().map(|r| r.cells()[c].clone()).collect();
                    Column::from_trusted(column.name(), cells, column.content_kind())
                })
                .collect();
        }
        debug!(
            table = %self.name,
            column = col,
            ascending,
            "sorted rows by column"
        );
        Ok(())
    }

    /// Rows whose cell in `col` satisfies `condition`, as a new table named
    /// `<name>_Subset` with the same options.
    pub fn subset_by_condition(&self, col: usize, condition: &Condition) -> Result<Table> {
        let keep = condition.evaluate(self.column(col)?.cells());
        Ok(self.filter_rows(&keep, format!("{}_Subset", self.name)))
    }

    /// Copy without any row that holds a sentinel.
    pub fn complete_cases(&self) -> Table {
        let keep: Vec<bool> = self.rows.iter().map(|r| !r.contains_sentinel()).collect();
        self.filter_rows(&keep, self.name.clone())
    }

    fn filter_rows(&self, keep: &[bool], name: String) -> Table {
        let mut table = Table::with_options(name, self.options.clone());
        if self.is_empty() {
            return table;
        }
        table.rows = self
            .rows
            .iter()
            .zip(keep)
            .filter(|&(_, &k)| k)
            .map(|(r, _)| r.clone())
            .collect();
        table.columns = self
            .columns
            .iter()
            .map(|column| {
                let cells = column
                    .cells()
                    .iter()
                    .zip(keep)
                    .filter(|&(_, &k)| k)
                    .map(|(c, _)| c.clone())
                    .collect();
                Column::from_trusted(column.name(), cells, column.content_kind())
            })
            .collect();
        table.schema = self.schema.clone();
        table
    }

    /// Bounding-box sub-table over inclusive row and column ranges.
    ///
    /// Covering the whole table borrows it unchanged.
    pub fn dice(
        &self,
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
    ) -> Result<Cow<'_, Table>> {
        if row_end >= self.nrow() {
            return Err(TableError::out_of_bounds(row_end, self.nrow()));
        }
        if col_end >= self.ncol() {
            return Err(TableError::out_of_bounds(col_end, self.ncol()));
        }
        if row_start > row_end || col_start > col_end {
            return Err(TableError::invalid_argument(format!(
                "dice bounds are reversed: rows {}..={}, columns {}..={}",
                row_start, row_end, col_start, col_end
            )));
        }
        if row_start == 0
            && row_end + 1 == self.nrow()
            && col_start == 0
            && col_end + 1 == self.ncol()
        {
            return Ok(Cow::Borrowed(self));
        }

        let mut table = Table::with_options(self.name.clone(), self.options.clone());
        table.columns = self.columns[col_start..=col_end]
            .iter()
            .map(|c| {
                Column::from_trusted(
                    c.name(),
                    c.cells()[row_start..=row_end].to_vec(),
                    c.content_kind(),
                )
            })
            .collect();
        table.rows = self.rows[row_start..=row_end]
            .iter()
            .map(|r| {
                Row::from_parts(
                    r.name().to_string(),
                    r.cells()[col_start..=col_end].to_vec(),
                    Schema::new(r.schema().kinds()[col_start..=col_end].to_vec()),
                )
            })
            .collect();
        table.schema = self
            .schema
            .as_ref()
            .map(|s| Schema::new(s.kinds()[col_start..=col_end].to_vec()));
        Ok(Cow::Owned(table))
    }

    /// The first `n` rows, or `default.head` rows when `n` is `None`.
    pub fn head(&self, n: Option<usize>) -> Result<Cow<'_, Table>> {
        let n = n.unwrap_or(self.options.default_head).min(self.nrow());
        if n == 0 || self.is_empty() {
            return Ok(Cow::Owned(Table::with_options(
                self.name.clone(),
                self.options.clone(),
            )));
        }
        self.dice(0, n - 1, 0, self.ncol() - 1)
    }

    // ------------------------------------------------------------------
    // Re-typing
    // ------------------------------------------------------------------

    /// Kind every column would share after [`Table::transform`].
    ///
    /// A singular table keeps its content kind. Otherwise the join of the
    /// columns' conversion kinds: text if any column cannot become numeric,
    /// else double if any needs double, else integer.
    pub fn common_kind(&self) -> Option<Kind> {
        let schema = self.schema.as_ref()?;
        if let Some(kind) = schema.content_kind() {
            return Some(kind);
        }
        Some(common_kind(
            self.columns
                .iter()
                .filter(|c| c.content_kind().is_some())
                .map(Column::numeric_conversion_kind),
        ))
    }

    /// Cast every column to the common kind, keeping orientation.
    ///
    /// Idempotent: once every column holds the common kind nothing changes.
    /// A no-op on an empty table. Fails without changes if any column cannot
    /// be cast.
    pub fn transform(&mut self) -> Result<()> {
        let Some(target) = self.common_kind() else {
            return Ok(());
        };
        if self
            .columns
            .iter()
            .all(|c| c.content_kind().map_or(true, |k| k == target))
        {
            return Ok(());
        }
        let columns = self
            .columns
            .iter()
            .map(|c| c.cast(target))
            .collect::<Result<Vec<_>>>()?;
        self.replace_columns(columns);
        debug!(table = %self.name, kind = %target, "transformed table");
        Ok(())
    }

    pub fn convert_column_to_numeric(&mut self, index: usize) -> Result<()> {
        let column = self.column(index)?.as_numeric()?;
        self.swap_column(index, column);
        Ok(())
    }

    pub fn convert_column_to_character(&mut self, index: usize) -> Result<()> {
        let column = self.column(index)?.as_character();
        self.swap_column(index, column);
        Ok(())
    }

    /// Cast every column to its own numeric kind, or change nothing.
    pub fn convert_to_numeric(&mut self) -> Result<()> {
        let columns = self
            .columns
            .iter()
            .map(Column::as_numeric)
            .collect::<Result<Vec<_>>>()?;
        self.replace_columns(columns);
        Ok(())
    }

    pub fn convert_to_character(&mut self) {
        let columns = self.columns.iter().map(Column::as_character).collect();
        self.replace_columns(columns);
    }

    /// Cast every text column the conversion scan finds numeric.
    ///
    /// A failed cast (a non-numeric token past the scanned prefix) keeps the
    /// column as text and lands in the exception log instead of failing the
    /// call. Returns the number of columns converted.
    pub fn autobox(&mut self) -> usize {
        let mut converted = 0;
        for index in 0..self.ncol() {
            let column = &self.columns[index];
            if column.is_numeric() || !column.is_convertible_to_numeric() {
                continue;
            }
            match column.as_numeric() {
                Ok(numeric) => {
                    self.swap_column(index, numeric);
                    converted += 1;
                }
                Err(err) => {
                    warn!(
                        table = %self.name,
                        column = %self.columns[index].name(),
                        error = %err,
                        "autobox failed, column kept as text"
                    );
                    self.exceptions.push(err);
                }
            }
        }
        debug!(table = %self.name, converted, "autoboxed columns");
        converted
    }

    /// Push the table schema down into every row so that sentinel positions
    /// carry the column's concrete kind. Cached until the next mutation.
    pub fn render_state(&mut self) -> Result<()> {
        if self.rendered {
            return Ok(());
        }
        if let Some(schema) = &self.schema {
            if let Some(row) = self.rows.iter().find(|r| !r.schema().is_compatible(schema)) {
                return Err(TableError::schema_mismatch(format!(
                    "row '{}' has schema {} which cannot take table schema {}",
                    row.name(),
                    row.schema(),
                    schema
                )));
            }
            for row in &mut self.rows {
                row.adopt_schema(schema)?;
            }
        }
        self.rendered = true;
        Ok(())
    }
}

/// Exclusive end of a removal range, validated against `len`.
fn checked_range(start: usize, end: usize, inclusive: bool, len: usize) -> Result<usize> {
    let end = if inclusive {
        end.checked_add(1)
            .ok_or_else(|| TableError::out_of_bounds(end, len))?
    } else {
        end
    };
    if end > len {
        return Err(TableError::out_of_bounds(end - 1, len));
    }
    if start >= end {
        return Err(TableError::invalid_argument(format!(
            "empty range {}..{}",
            start, end
        )));
    }
    Ok(end)
}
