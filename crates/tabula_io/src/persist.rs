//! JSON snapshots of tables and matrices.
//!
//! Derived caches are not stored. A loaded table recomputes them on first
//! use and starts out unrendered.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tabula_core::Matrix;
use tracing::info;

use crate::error::Result;

use tabula_core::Table;

fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    save(table, path)?;
    info!(path = %path.display(), table = %table.name(), "saved table");
    Ok(())
}

pub fn load_table(path: &Path) -> Result<Table> {
    let table: Table = load(path)?;
    info!(path = %path.display(), table = %table.name(), "loaded table");
    Ok(table)
}

pub fn save_matrix(matrix: &Matrix, path: &Path) -> Result<()> {
    save(matrix, path)?;
    info!(path = %path.display(), matrix = %matrix.name(), "saved matrix");
    Ok(())
}

/// Load a matrix, rejecting snapshots that hold non-numeric cells.
pub fn load_matrix(path: &Path) -> Result<Matrix> {
    let matrix: Matrix = load(path)?;
    matrix.check_cells()?;
    info!(path = %path.display(), matrix = %matrix.name(), "loaded matrix");
    Ok(matrix)
}
