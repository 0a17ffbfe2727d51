//! Named numeric table options.
//!
//! Options are addressed by their dotted names (`"max.print"`,
//! `"col.whitespace"`, ...) so consumers can treat them as a small key/value
//! map while the core keeps them typed.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Rows printed before output is cut off.
pub const DEFAULT_MAX_PRINT: usize = 10_000;
/// Spaces between printed columns.
pub const DEFAULT_COL_WHITESPACE: usize = 4;
/// Rows shown by a head view.
pub const DEFAULT_HEAD: usize = 6;
/// Initial row capacity for new columns.
pub const DEFAULT_NUM_ROWS: usize = 25;
/// Initial column capacity for new rows.
pub const DEFAULT_NUM_COLS: usize = 10;

/// Every option name, in display order.
pub const OPTION_NAMES: [&str; 7] = [
    "max.print",
    "col.whitespace",
    "default.head",
    "default.num.rows",
    "default.num.cols",
    "print.col.names",
    "print.table.name",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    pub max_print: usize,
    pub col_whitespace: usize,
    pub default_head: usize,
    pub default_num_rows: usize,
    pub default_num_cols: usize,
    /// Print column names (1) or not (0)
    pub print_col_names: usize,
    /// Print the table name (1) or not (0)
    pub print_table_name: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_print: DEFAULT_MAX_PRINT,
            col_whitespace: DEFAULT_COL_WHITESPACE,
            default_head: DEFAULT_HEAD,
            default_num_rows: DEFAULT_NUM_ROWS,
            default_num_cols: DEFAULT_NUM_COLS,
            print_col_names: 1,
            print_table_name: 1,
        }
    }
}

impl TableOptions {
    /// Options for numeric-only containers: names are not printed.
    pub fn matrix() -> Self {
        Self {
            print_col_names: 0,
            print_table_name: 0,
            ..Self::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        let value = match name {
            "max.print" => self.max_print,
            "col.whitespace" => self.col_whitespace,
            "default.head" => self.default_head,
            "default.num.rows" => self.default_num_rows,
            "default.num.cols" => self.default_num_cols,
            "print.col.names" => self.print_col_names,
            "print.table.name" => self.print_table_name,
            _ => return None,
        };
        Some(value)
    }

    /// Set an option by name.
    ///
    /// The two print flags accept only 0 or 1; every other option must be
    /// at least 1.
    pub fn set(&mut self, name: &str, value: usize) -> Result<()> {
        let is_flag = matches!(name, "print.col.names" | "print.table.name");
        if is_flag && value > 1 {
            return Err(TableError::invalid_argument(format!(
                "option '{}' is a flag and takes 0 or 1, got {}",
                name, value
            )));
        }
        if !is_flag && value < 1 {
            return Err(TableError::invalid_argument(format!(
                "option '{}' must be at least 1",
                name
            )));
        }
        let slot = match name {
            "max.print" => &mut self.max_print,
            "col.whitespace" => &mut self.col_whitespace,
            "default.head" => &mut self.default_head,
            "default.num.rows" => &mut self.default_num_rows,
            "default.num.cols" => &mut self.default_num_cols,
            "print.col.names" => &mut self.print_col_names,
            "print.table.name" => &mut self.print_table_name,
            _ => {
                return Err(TableError::invalid_argument(format!(
                    "unknown option '{}'",
                    name
                )))
            }
        };
        *slot = value;
        Ok(())
    }

    /// `(name, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, usize)> {
        OPTION_NAMES
            .iter()
            .filter_map(|&name| self.get(name).map(|v| (name, v)))
            .collect()
    }
}
