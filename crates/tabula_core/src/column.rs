//! Homogeneous, order-preserving columns.
//!
//! A column holds cells of one concrete kind. Sentinels may appear anywhere.
//! The first ordinary cell ever added fixes the kind; later cells must match
//! it or fail with [`TableError::SchemaMismatch`].
//!
//! Derived properties (numeric-ness, conversion target, display width,
//! sentinel counts) live in a single [`ColumnProfile`] computed on first use
//! and dropped by every mutating method.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{compare_cells, Cell, Factor, Kind, Number};
use crate::condition::Condition;
use crate::error::{Result, TableError};
use crate::inference::{is_integer_shaped, numeric_conversion_kind};
use crate::row::Row;
use crate::sentinel::{MissingOrder, Sentinel, Sign};

/// Name given to columns created without one.
pub const DEFAULT_COLUMN_NAME: &str = "DataColumn";

/// Cached derived state of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnProfile {
    conversion: Option<Kind>,
    width: usize,
    sentinels: usize,
    missing: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
    kind: Option<Kind>,
    #[serde(skip)]
    profile: OnceCell<ColumnProfile>,
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind && self.cells == other.cells
    }
}

impl Default for Column {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_NAME)
    }
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        let mut column = Self {
            name: String::new(),
            cells: Vec::new(),
            kind: None,
            profile: OnceCell::new(),
        };
        column.set_name(name);
        column
    }

    /// Build a column from cells, enforcing a single concrete kind.
    pub fn from_cells(name: impl Into<String>, cells: Vec<Cell>) -> Result<Self> {
        let mut column = Self::new(name);
        column.extend(cells)?;
        Ok(column)
    }

    /// Convenience constructor from anything convertible into cells.
    pub fn from_values<I, T>(name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Cell>,
    {
        Self::from_cells(name, values.into_iter().map(Into::into).collect())
    }

    /// Build a column whose cells are already known to agree with `kind`.
    pub(crate) fn from_trusted(name: impl Into<String>, cells: Vec<Cell>, kind: Option<Kind>) -> Self {
        let mut column = Self::new(name);
        column.cells = cells;
        column.kind = kind.or_else(|| first_concrete_kind(&column.cells));
        column
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the column. An empty name restores the default.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.is_empty() {
            DEFAULT_COLUMN_NAME.to_string()
        } else {
            name
        };
        self.invalidate();
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

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// The established content kind, `None` while only sentinels were added.
    pub fn content_kind(&self) -> Option<Kind> {
        self.kind
    }

    /// Kind this column contributes to a table schema: its content kind, or
    /// the first sentinel kind it holds when it has none.
    pub fn schema_kind(&self) -> Kind {
        self.kind
            .or_else(|| self.cells.first().map(Cell::kind))
            .unwrap_or(Kind::Missing)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Check that `cell` may join this column.
    pub fn check(&self, cell: &Cell) -> Result<()> {
        check_kind(&self.name, self.kind, cell)
    }

    pub fn push(&mut self, cell: impl Into<Cell>) -> Result<()> {
        let cell = Cell::normalize(cell.into());
        self.check(&cell)?;
        self.push_trusted(cell);
        Ok(())
    }

    /// Append every cell or none of them.
    pub fn extend<I>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = Cell>,
    {
        let cells: Vec<Cell> = cells.into_iter().map(Cell::normalize).collect();
        let mut kind = self.kind;
        for cell in &cells {
            check_kind(&self.name, kind, cell)?;
            if kind.is_none() && !cell.is_sentinel() {
                kind = Some(cell.kind());
            }
        }
        self.kind = kind;
        self.cells.extend(cells);
        self.invalidate();
        Ok(())
    }

    pub fn insert(&mut self, index: usize, cell: impl Into<Cell>) -> Result<()> {
        if index > self.len() {
            return Err(TableError::out_of_bounds(index, self.len()));
        }
        let cell = Cell::normalize(cell.into());
        self.check(&cell)?;
        self.insert_trusted(index, cell);
        Ok(())
    }

    /// Replace the cell at `index`, returning the old one.
    pub fn set(&mut self, index: usize, cell: impl Into<Cell>) -> Result<Cell> {
        if index >= self.len() {
            return Err(TableError::out_of_bounds(index, self.len()));
        }
        let cell = Cell::normalize(cell.into());
        self.check(&cell)?;
        Ok(self.set_trusted(index, cell))
    }

    pub fn remove(&mut self, index: usize) -> Result<Cell> {
        if index >= self.len() {
            return Err(TableError::out_of_bounds(index, self.len()));
        }
        self.invalidate();
        Ok(self.cells.remove(index))
    }

    /// Drop every cell and forget the content kind.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.kind = None;
        self.invalidate();
    }

    pub(crate) fn push_trusted(&mut self, cell: Cell) {
        self.adopt_kind(&cell);
        self.cells.push(cell);
        self.invalidate();
    }

    pub(crate) fn insert_trusted(&mut self, index: usize, cell: Cell) {
        self.adopt_kind(&cell);
        self.cells.insert(index, cell);
        self.invalidate();
    }

    pub(crate) fn set_trusted(&mut self, index: usize, cell: Cell) -> Cell {
        self.adopt_kind(&cell);
        self.invalidate();
        std::mem::replace(&mut self.cells[index], cell)
    }

    /// Reorder cells by a permutation of indices.
    pub(crate) fn permute(&mut self, order: &[usize]) {
        self.cells = order.iter().map(|&i| self.cells[i].clone()).collect();
        self.invalidate();
    }

    fn adopt_kind(&mut self, cell: &Cell) {
        if self.kind.is_none() && !cell.is_sentinel() {
            self.kind = Some(cell.kind());
        }
    }

    fn invalidate(&mut self) {
        self.profile.take();
    }

    fn profile(&self) -> &ColumnProfile {
        self.profile.get_or_init(|| {
            let conversion = match self.kind {
                Some(kind) if kind.is_numeric() => Some(kind),
                _ => numeric_conversion_kind(&self.cells),
            };
            let width = self
                .cells
                .iter()
                .map(|c| c.to_string().chars().count())
                .chain(std::iter::once(self.name.chars().count()))
                .max()
                .unwrap_or(0);
            let sentinels = self.cells.iter().filter(|c| c.is_sentinel()).count();
            let missing = self.cells.iter().filter(|c| c.is_missing()).count();
            ColumnProfile {
                conversion,
                width,
                sentinels,
                missing,
            }
        })
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Content kind is integer or double.
    pub fn is_numeric(&self) -> bool {
        self.kind.map_or(false, Kind::is_numeric)
    }

    /// Numeric kind this column would cast to, if any.
    pub fn numeric_conversion_kind(&self) -> Option<Kind> {
        self.profile().conversion
    }

    pub fn is_convertible_to_numeric(&self) -> bool {
        self.numeric_conversion_kind().is_some()
    }

    pub fn contains_sentinel(&self) -> bool {
        self.profile().sentinels > 0
    }

    pub fn count_missing_values(&self) -> usize {
        self.profile().missing
    }

    /// Longest rendering among the cells and the name.
    pub fn width(&self) -> usize {
        self.profile().width
    }

    /// Distinct cells in order of first appearance.
    pub fn unique(&self) -> Vec<Cell> {
        unique_cells(&self.cells)
    }

    // ------------------------------------------------------------------
    // Conversion
    // ------------------------------------------------------------------

    /// Cast to the numeric kind the conversion scan settles on.
    pub fn as_numeric(&self) -> Result<Column> {
        match self.numeric_conversion_kind() {
            Some(Kind::Double) => self.as_double(),
            Some(_) => self.as_integer(),
            None if self.kind.is_none() => Ok(self.clone()),
            None => Err(TableError::conversion(format!(
                "column '{}' is not convertible to numeric",
                self.name
            ))),
        }
    }

    pub fn as_integer(&self) -> Result<Column> {
        let cells = self
            .cells
            .iter()
            .map(|cell| to_integer(cell, &self.name))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.derived(cells, Kind::Integer))
    }

    pub fn as_double(&self) -> Result<Column> {
        let cells = self
            .cells
            .iter()
            .map(|cell| to_double(cell, &self.name))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.derived(cells, Kind::Double))
    }

    /// Every ordinary cell becomes its textual rendering.
    pub fn as_character(&self) -> Column {
        let cells = self
            .cells
            .iter()
            .map(|cell| match cell.sentinel() {
                Some(sentinel) => Cell::from(sentinel),
                None => Cell::Text(cell.to_string()),
            })
            .collect();
        self.derived(cells, Kind::Text)
    }

    /// Levels are assigned from zero in order of first appearance.
    pub fn as_factor(&self) -> Column {
        if self.kind == Some(Kind::Factor) {
            return self.clone();
        }
        let mut levels: HashMap<String, usize> = HashMap::new();
        let cells = self
            .cells
            .iter()
            .map(|cell| match cell.sentinel() {
                Some(sentinel) => Cell::from(sentinel),
                None => {
                    let label = cell.to_string();
                    let next = levels.len();
                    let level = *levels.entry(label.clone()).or_insert(next);
                    Cell::Factor(Factor::new(label, level))
                }
            })
            .collect();
        self.derived(cells, Kind::Factor)
    }

    /// Cast to an explicit kind.
    pub fn cast(&self, kind: Kind) -> Result<Column> {
        match kind {
            Kind::Integer => self.as_integer(),
            Kind::Double => self.as_double(),
            Kind::Text => Ok(self.as_character()),
            Kind::Factor => Ok(self.as_factor()),
            _ if self.kind.map_or(true, |k| k == kind) => Ok(self.clone()),
            _ => Err(TableError::conversion(format!(
                "column '{}' cannot be cast to {}",
                self.name, kind
            ))),
        }
    }

    fn derived(&self, cells: Vec<Cell>, kind: Kind) -> Column {
        let kind = cells.iter().any(|c| !c.is_sentinel()).then_some(kind);
        Column::from_trusted(self.name.clone(), cells, kind)
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    /// Numeric kind and the values of every ordinary cell.
    fn numeric_values(&self) -> Result<(Kind, Vec<f64>)> {
        if self.cells.iter().all(Cell::is_sentinel) {
            return Err(TableError::missing_value(format!(
                "cannot compute over column '{}': no ordinary values",
                self.name
            )));
        }
        let kind = self.numeric_kind_or_err()?;
        let values = self
            .cells
            .iter()
            .filter(|c| !c.is_sentinel())
            .map(|c| {
                c.numeric_value().ok_or_else(|| {
                    TableError::conversion(format!(
                        "'{}' in column '{}' is not numeric",
                        c, self.name
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((kind, values))
    }

    fn numeric_kind_or_err(&self) -> Result<Kind> {
        self.numeric_conversion_kind().ok_or_else(|| {
            TableError::conversion(format!("column '{}' is not numeric", self.name))
        })
    }

    pub fn sum(&self) -> Result<Number> {
        let (kind, values) = self.numeric_values()?;
        Ok(Number::from_f64(kind, values.iter().sum()))
    }

    pub fn mean(&self) -> Result<f64> {
        let (_, values) = self.numeric_values()?;
        Ok(mean_of(&values))
    }

    /// Sample variance (n - 1 denominator). A single value yields NaN.
    pub fn variance(&self) -> Result<f64> {
        let (_, values) = self.numeric_values()?;
        let mean = mean_of(&values);
        let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        Ok(squares / (values.len() as f64 - 1.0))
    }

    pub fn standard_deviation(&self) -> Result<f64> {
        Ok(self.variance()?.sqrt())
    }

    pub fn min(&self) -> Result<Number> {
        let (kind, values) = self.numeric_values()?;
        Ok(Number::from_f64(kind, values.iter().copied().fold(f64::INFINITY, f64::min)))
    }

    pub fn max(&self) -> Result<Number> {
        let (kind, values) = self.numeric_values()?;
        Ok(Number::from_f64(
            kind,
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ))
    }

    pub fn range(&self) -> Result<Number> {
        let (kind, values) = self.numeric_values()?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Number::from_f64(kind, max - min))
    }

    /// Most frequent ordinary cell. Works for any kind; ties go to the value
    /// seen first.
    pub fn mode(&self) -> Result<Cell> {
        let mut counts: HashMap<(Kind, String), (usize, usize)> = HashMap::new();
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.is_sentinel() {
                continue;
            }
            counts.entry(cell.identity()).or_insert((index, 0)).1 += 1;
        }
        counts
            .values()
            .max_by(|(ia, ca), (ib, cb)| ca.cmp(cb).then(ib.cmp(ia)))
            .map(|&(index, _)| self.cells[index].clone())
            .ok_or_else(|| {
                TableError::missing_value(format!(
                    "column '{}' has no ordinary values for a mode",
                    self.name
                ))
            })
    }

    /// Numeric overview of the column; non-numeric columns carry only shape.
    pub fn summary(&self) -> ColumnSummary {
        let stats = self.numeric_values().ok().and_then(|_| {
            Some(NumericSummary {
                sum: self.sum().ok()?,
                mean: self.mean().ok()?,
                standard_deviation: self.standard_deviation().ok()?,
                min: self.min().ok()?,
                max: self.max().ok()?,
            })
        });
        ColumnSummary {
            name: self.name.clone(),
            kind: self.kind,
            len: self.len(),
            width: self.width(),
            missing: self.count_missing_values(),
            stats,
        }
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Stable permutation that sorts this column.
    pub fn ranked_indices(&self, ascending: bool, order: MissingOrder) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.cells.len()).collect();
        indices.sort_by(|&a, &b| {
            let ordering = compare_cells(&self.cells[a], &self.cells[b], order);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        indices
    }

    pub fn sort_ascending(&mut self, order: MissingOrder) {
        let indices = self.ranked_indices(true, order);
        self.permute(&indices);
    }

    pub fn sort_descending(&mut self, order: MissingOrder) {
        let indices = self.ranked_indices(false, order);
        self.permute(&indices);
    }

    // ------------------------------------------------------------------
    // Vector algebra
    // ------------------------------------------------------------------

    fn paired_values(&self, other: &Column) -> Result<(Kind, Vec<(f64, f64)>)> {
        if self.len() != other.len() {
            return Err(TableError::dimension_mismatch(self.len(), other.len()));
        }
        let kind = match (self.numeric_kind_or_err()?, other.numeric_kind_or_err()?) {
            (Kind::Integer, Kind::Integer) => Kind::Integer,
            _ => Kind::Double,
        };
        let pairs = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| Ok((vector_value(a, &self.name)?, vector_value(b, &other.name)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok((kind, pairs))
    }

    /// Sum of pairwise products; double when either side is double.
    pub fn inner_product(&self, other: &Column) -> Result<Number> {
        let (kind, pairs) = self.paired_values(other)?;
        Ok(Number::from_f64(kind, pairs.iter().map(|(a, b)| a * b).sum()))
    }

    /// Minkowski distance of order `q` (`q >= 1`).
    pub fn distance(&self, other: &Column, q: u32) -> Result<f64> {
        if q < 1 {
            return Err(TableError::invalid_argument("q must be at least 1"));
        }
        let (_, pairs) = self.paired_values(other)?;
        let total: f64 = pairs.iter().map(|(a, b)| (a - b).abs().powi(q as i32)).sum();
        if total == 0.0 {
            Ok(0.0)
        } else {
            Ok(total.powf(1.0 / q as f64))
        }
    }

    pub fn euclidean_distance(&self, other: &Column) -> Result<f64> {
        self.distance(other, 2)
    }

    /// Multiply every ordinary cell; sentinels pass through.
    pub fn scale_by_factor(&self, scalar: f64) -> Result<Column> {
        self.map_numeric(|v| v * scalar, Cell::from)
    }

    /// Subtract the mean from every ordinary cell.
    pub fn center(&self) -> Result<Column> {
        let mean = self.mean()?;
        self.map_numeric(|v| v - mean, Cell::from)
    }

    /// Center, then divide by the standard deviation.
    pub fn standardize(&self) -> Result<Column> {
        let mean = self.mean()?;
        let sd = self.standard_deviation()?;
        self.map_numeric(|v| (v - mean) / sd, Cell::from)
    }

    /// Natural log. Infinite cells map to negative infinity.
    pub fn log_transform(&self) -> Result<Column> {
        self.map_numeric(f64::ln, |sentinel| match sentinel {
            Sentinel::Missing => Cell::Missing,
            Sentinel::Infinite(_) => Cell::Infinite(Sign::Negative),
        })
    }

    fn map_numeric<F, S>(&self, f: F, on_sentinel: S) -> Result<Column>
    where
        F: Fn(f64) -> f64,
        S: Fn(Sentinel) -> Cell,
    {
        self.numeric_kind_or_err()?;
        let cells = self
            .cells
            .iter()
            .map(|cell| match cell.sentinel() {
                Some(sentinel) => Ok(on_sentinel(sentinel)),
                None => cell
                    .numeric_value()
                    .map(|v| Cell::from_computed(f(v)))
                    .ok_or_else(|| {
                        TableError::conversion(format!(
                            "'{}' in column '{}' is not numeric",
                            cell, self.name
                        ))
                    }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.derived(cells, Kind::Double))
    }

    // ------------------------------------------------------------------
    // Reshaping
    // ------------------------------------------------------------------

    /// Cells kept by `condition`, in a column named `<name>_Subset`.
    pub fn subset_by_condition(&self, condition: &Condition) -> Column {
        let cells = self
            .cells
            .iter()
            .filter(|c| condition.keeps(c))
            .cloned()
            .collect();
        Column::from_trusted(format!("{}_Subset", self.name), cells, self.kind)
    }

    pub fn to_row(&self) -> Row {
        Row::from_cells(self.name.clone(), self.cells.clone())
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

fn check_kind(name: &str, kind: Option<Kind>, cell: &Cell) -> Result<()> {
    match kind {
        Some(kind) if !cell.is_sentinel() && cell.kind() != kind => {
            Err(TableError::schema_mismatch(format!(
                "column '{}' holds {} values, got {} '{}'",
                name,
                kind,
                cell.kind(),
                cell
            )))
        }
        _ => Ok(()),
    }
}

fn first_concrete_kind(cells: &[Cell]) -> Option<Kind> {
    cells.iter().find(|c| !c.is_sentinel()).map(Cell::kind)
}

pub(crate) fn unique_cells(cells: &[Cell]) -> Vec<Cell> {
    let mut seen = HashSet::new();
    cells
        .iter()
        .filter(|c| seen.insert(c.identity()))
        .cloned()
        .collect()
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn vector_value(cell: &Cell, name: &str) -> Result<f64> {
    if cell.is_sentinel() {
        return Err(TableError::missing_value(format!(
            "column '{}' holds {} and cannot enter vector arithmetic",
            name, cell
        )));
    }
    cell.numeric_value()
        .ok_or_else(|| TableError::conversion(format!("'{}' in column '{}' is not numeric", cell, name)))
}

fn to_integer(cell: &Cell, name: &str) -> Result<Cell> {
    if let Some(sentinel) = cell.sentinel() {
        return Ok(sentinel.into());
    }
    let failed = || {
        TableError::conversion(format!(
            "cannot read '{}' in column '{}' as an integer",
            cell, name
        ))
    };
    match cell {
        Cell::Integer(v) => Ok(Cell::Integer(*v)),
        Cell::Double(v) if v.fract() == 0.0 => Ok(Cell::Integer(*v as i64)),
        Cell::Boolean(_) | Cell::Double(_) => Err(failed()),
        other => {
            let token = other.to_string();
            if !is_integer_shaped(&token) {
                return Err(failed());
            }
            token.parse().map(Cell::Integer).map_err(|_| failed())
        }
    }
}

fn to_double(cell: &Cell, name: &str) -> Result<Cell> {
    if let Some(sentinel) = cell.sentinel() {
        return Ok(sentinel.into());
    }
    match cell {
        Cell::Boolean(_) => None,
        Cell::Factor(f) => f.label.parse().ok(),
        other => other.parsed_f64(),
    }
    .map(Cell::from_computed)
    .ok_or_else(|| {
        TableError::conversion(format!(
            "cannot read '{}' in column '{}' as a double",
            cell, name
        ))
    })
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub sum: Number,
    pub mean: f64,
    pub standard_deviation: f64,
    pub min: Number,
    pub max: Number,
}

/// Overview of a column as reported by [`Column::summary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: Option<Kind>,
    pub len: usize,
    pub width: usize,
    pub missing: usize,
    pub stats: Option<NumericSummary>,
}

impl fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if let Some(stats) = &self.stats {
            writeln!(f, "Sum:                {}", stats.sum)?;
            writeln!(f, "Mean:               {}", stats.mean)?;
            writeln!(f, "Standard Deviation: {}", stats.standard_deviation)?;
            writeln!(f, "Max:                {}", stats.max)?;
            writeln!(f, "Min:                {}", stats.min)?;
        }
        writeln!(f, "Width:              {}", self.width)?;
        match self.kind {
            Some(kind) => writeln!(f, "Type:               {}", kind)?,
            None => writeln!(f, "Type:               undetermined")?,
        }
        writeln!(f, "Missing:            {}", self.missing)?;
        write!(f, "Size:               {}", self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Column {
        Column::from_values("ints", values.iter().copied()).unwrap()
    }

    fn text(values: &[&str]) -> Column {
        Column::from_values("text", values.iter().copied()).unwrap()
    }

    #[test]
    fn test_first_ordinary_cell_fixes_kind() {
        let mut col = Column::new("c");
        col.push(Cell::Missing).unwrap();
        assert_eq!(col.content_kind(), None);
        col.push(3).unwrap();
        assert_eq!(col.content_kind(), Some(Kind::Integer));
        assert!(matches!(col.push("x"), Err(TableError::SchemaMismatch(_))));
        col.push(Cell::Infinite(Sign::Negative)).unwrap();
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn test_extend_is_atomic() {
        let mut col = ints(&[1, 2]);
        let result = col.extend(vec![Cell::Integer(3), Cell::from("x")]);
        assert!(result.is_err());
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn test_default_name_restored() {
        let mut col = Column::new("");
        assert_eq!(col.name(), DEFAULT_COLUMN_NAME);
        col.set_name("score");
        assert_eq!(col.name(), "score");
    }

    #[test]
    fn test_profile_invalidated_by_mutation() {
        let mut col = text(&["1", "2"]);
        assert_eq!(col.numeric_conversion_kind(), Some(Kind::Integer));
        assert!(!col.contains_sentinel());
        col.push("2.5").unwrap();
        assert_eq!(col.numeric_conversion_kind(), Some(Kind::Double));
        col.push("NA").unwrap();
        assert!(col.contains_sentinel());
        assert_eq!(col.count_missing_values(), 1);
    }

    #[test]
    fn test_width_includes_name() {
        let col = Column::from_values("a_long_name", [1, 22]).unwrap();
        assert_eq!(col.width(), 11);
        let col = Column::from_values("x", ["abcdef"]).unwrap();
        assert_eq!(col.width(), 6);
    }

    #[test]
    fn test_as_numeric_from_text() {
        let col = text(&["1", "NA", "3"]).as_numeric().unwrap();
        assert_eq!(col.content_kind(), Some(Kind::Integer));
        assert_eq!(col.cells(), &[Cell::Integer(1), Cell::Missing, Cell::Integer(3)]);

        let col = text(&["1", "2.5"]).as_numeric().unwrap();
        assert_eq!(col.cells(), &[Cell::Double(1.0), Cell::Double(2.5)]);

        assert!(matches!(
            text(&["1", "b"]).as_numeric(),
            Err(TableError::Conversion(_))
        ));
    }

    #[test]
    fn test_as_integer_rejects_fractions() {
        let col = Column::from_values("d", [1.0, 2.0]).unwrap();
        assert_eq!(col.as_integer().unwrap().cells(), &[Cell::Integer(1), Cell::Integer(2)]);
        let col = Column::from_values("d", [1.5]).unwrap();
        assert!(matches!(col.as_integer(), Err(TableError::Conversion(_))));
    }

    #[test]
    fn test_character_round_trip() {
        let col = Column::from_values("d", [1.0, 2.5]).unwrap();
        let back = col.as_character().as_numeric().unwrap();
        assert_eq!(back.cells(), col.cells());
    }

    #[test]
    fn test_as_factor_levels_by_appearance() {
        let col = text(&["b", "a", "b", "NA"]).as_factor();
        assert_eq!(
            col.cells(),
            &[
                Cell::Factor(Factor::new("b", 0)),
                Cell::Factor(Factor::new("a", 1)),
                Cell::Factor(Factor::new("b", 0)),
                Cell::Missing,
            ]
        );
    }

    #[test]
    fn test_statistics_skip_sentinels() {
        let col = Column::from_cells(
            "score",
            vec![Cell::Double(1.5), Cell::Missing, Cell::Double(3.0)],
        )
        .unwrap();
        assert_eq!(col.mean().unwrap(), 2.25);
        assert_eq!(col.sum().unwrap(), Number::Double(4.5));
        assert_eq!(col.max().unwrap(), Number::Double(3.0));
        assert_eq!(col.range().unwrap(), Number::Double(1.5));
        assert!((col.variance().unwrap() - 1.125).abs() < 1e-12);
    }

    #[test]
    fn test_integer_statistics_stay_integer() {
        let col = ints(&[4, 1, 7]);
        assert_eq!(col.sum().unwrap(), Number::Integer(12));
        assert_eq!(col.min().unwrap(), Number::Integer(1));
        assert_eq!(col.range().unwrap(), Number::Integer(6));
        assert_eq!(col.mean().unwrap(), 4.0);
    }

    #[test]
    fn test_all_sentinel_statistics_fail() {
        let col = Column::from_cells("na", vec![Cell::Missing, Cell::Missing]).unwrap();
        assert!(matches!(col.mean(), Err(TableError::MissingValue(_))));
        assert!(matches!(col.mode(), Err(TableError::MissingValue(_))));
        assert!(matches!(Column::new("e").sum(), Err(TableError::MissingValue(_))));
    }

    #[test]
    fn test_single_value_variance_is_nan() {
        assert!(ints(&[5]).variance().unwrap().is_nan());
    }

    #[test]
    fn test_mode_ties_first_seen() {
        let col = text(&["b", "a", "a", "b", "NA", "NA", "NA"]);
        assert_eq!(col.mode().unwrap(), Cell::from("b"));
        assert_eq!(ints(&[3, 1, 1]).mode().unwrap(), Cell::Integer(1));
    }

    #[test]
    fn test_sort_places_missing_low() {
        let mut col = Column::from_cells(
            "c",
            vec![Cell::Integer(3), Cell::Missing, Cell::Integer(1)],
        )
        .unwrap();
        col.sort_ascending(MissingOrder::Low);
        assert_eq!(col.cells(), &[Cell::Missing, Cell::Integer(1), Cell::Integer(3)]);
        col.sort_ascending(MissingOrder::High);
        assert_eq!(col.cells(), &[Cell::Integer(1), Cell::Integer(3), Cell::Missing]);
    }

    #[test]
    fn test_sort_descending_infinity_first() {
        let mut col = Column::from_cells(
            "c",
            vec![Cell::Double(1.0), Cell::Infinite(Sign::Positive), Cell::Double(9.0)],
        )
        .unwrap();
        col.sort_descending(MissingOrder::Low);
        assert_eq!(col.cells()[0], Cell::Infinite(Sign::Positive));
        assert_eq!(col.cells()[1], Cell::Double(9.0));
    }

    #[test]
    fn test_ranked_indices_stable() {
        let col = ints(&[2, 1, 2, 1]);
        assert_eq!(col.ranked_indices(true, MissingOrder::Low), vec![1, 3, 0, 2]);
        assert_eq!(col.ranked_indices(false, MissingOrder::Low), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_vector_algebra() {
        let a = ints(&[1, 2, 3]);
        let b = ints(&[4, 5, 6]);
        assert_eq!(a.inner_product(&b).unwrap(), Number::Integer(32));
        let c = Column::from_values("c", [1.0, 1.0, 1.0]).unwrap();
        assert_eq!(a.inner_product(&c).unwrap(), Number::Double(6.0));
        assert!((a.euclidean_distance(&b).unwrap() - 27f64.sqrt()).abs() < 1e-12);
        assert_eq!(a.distance(&b, 1).unwrap(), 9.0);
        assert!(matches!(a.distance(&b, 0), Err(TableError::InvalidArgument(_))));
        assert_eq!(
            a.inner_product(&ints(&[1])),
            Err(TableError::dimension_mismatch(3, 1))
        );
    }

    #[test]
    fn test_derived_columns_keep_sentinels() {
        let col = Column::from_cells(
            "c",
            vec![Cell::Integer(1), Cell::Missing, Cell::Integer(3)],
        )
        .unwrap();
        let centered = col.center().unwrap();
        assert_eq!(
            centered.cells(),
            &[Cell::Double(-1.0), Cell::Missing, Cell::Double(1.0)]
        );
        let scaled = col.scale_by_factor(2.0).unwrap();
        assert_eq!(scaled.cells()[2], Cell::Double(6.0));
        let logged = Column::from_cells("l", vec![Cell::Infinite(Sign::Positive), Cell::Integer(1)])
            .unwrap()
            .log_transform()
            .unwrap();
        assert_eq!(logged.cells(), &[Cell::Infinite(Sign::Negative), Cell::Double(0.0)]);
    }

    #[test]
    fn test_subset_and_unique() {
        let col = ints(&[1, 5, 1, 7]);
        let kept = col.subset_by_condition(&Condition::greater_than(2).unwrap());
        assert_eq!(kept.name(), "ints_Subset");
        assert_eq!(kept.cells(), &[Cell::Integer(5), Cell::Integer(7)]);
        assert_eq!(col.unique(), vec![Cell::Integer(1), Cell::Integer(5), Cell::Integer(7)]);
    }

    #[test]
    fn test_summary_reports_stats_for_numeric_only() {
        let summary = ints(&[1, 2, 3]).summary();
        assert_eq!(summary.stats.as_ref().map(|s| s.mean), Some(2.0));
        assert!(text(&["a"]).summary().stats.is_none());
        assert!(summary.to_string().contains("Size:"));
    }
}
