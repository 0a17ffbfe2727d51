//! Tabula core: a schema-enforcing, in-memory tabular data model.
//!
//! # Model
//!
//! - [`Cell`]: one value. Ordinary values are integers, doubles, booleans,
//!   text and factors. Two sentinels mark absent or unbounded data:
//!   [`Cell::Missing`] (`NA`) and [`Cell::Infinite`] (`Infinity`).
//! - [`Column`]: homogeneous cells. The first ordinary cell fixes the kind.
//! - [`Row`]: heterogeneous cells plus a positional [`Schema`].
//! - [`Table`]: columns and rows kept as two consistent views of one grid.
//!   Every write lands in both or in neither.
//! - [`Matrix`]: a table that only admits numeric cells, with products,
//!   transposition and mean imputation.
//!
//! Sentinels are compatible with every kind. A position whose schema entry
//! is still a sentinel kind upgrades to the first concrete kind it meets.
//!
//! # Errors
//!
//! All fallible operations return [`Result`] with a [`TableError`]. A
//! rejected write leaves the target unchanged.

pub mod cell;
pub mod column;
pub mod condition;
pub mod error;
pub mod inference;
pub mod matrix;
pub mod options;
pub mod row;
pub mod schema;
pub mod sentinel;
pub mod table;

pub use cell::{compare_cells, format_double, Cell, Factor, Kind, Number};
pub use column::{Column, ColumnSummary, NumericSummary, DEFAULT_COLUMN_NAME};
pub use condition::{Condition, Operator};
pub use error::{Result, TableError};
pub use inference::{common_kind, numeric_conversion_kind, NumericConversionSolver};
pub use matrix::Matrix;
pub use options::{TableOptions, OPTION_NAMES};
pub use row::{Row, DEFAULT_ROW_NAME};
pub use schema::Schema;
pub use sentinel::{is_missing_token, MissingOrder, Sentinel, Sign};
pub use table::{Table, DEFAULT_TABLE_NAME};
