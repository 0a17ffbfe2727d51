//! Error types for tabula_io.

use std::path::PathBuf;

use tabula_core::TableError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Illegal delimiter: {0:?}")]
    InvalidDelimiter(char),

    #[error("Header mismatch on line {line}: {headers} headers but {found} fields")]
    HeaderMismatch {
        line: u64,
        headers: usize,
        found: usize,
    },

    #[error("Not a readable file: {}", .0.display())]
    NotAFile(PathBuf),
}

impl IoError {
    pub fn header_mismatch(line: u64, headers: usize, found: usize) -> Self {
        Self::HeaderMismatch {
            line,
            headers,
            found,
        }
    }
}
