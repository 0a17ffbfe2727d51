//! Error types for the tabular data model.
//!
//! Every variant is a contract violation raised at the point it happens.
//! Nothing in the core retries or swallows these, except bulk-ingestion
//! autoboxing which parks conversion failures in the table's exception log.

use thiserror::Error;

/// Data model result type.
pub type Result<T> = std::result::Result<T, TableError>;

/// Data model errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    /// A value's kind disagrees with the kind established for its position.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Row, column or vector lengths disagree.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Arithmetic attempted on data that is empty once sentinels are removed.
    #[error("Missing value: {0}")]
    MissingValue(String),

    /// A numeric-only container received non-numeric content, or a matrix
    /// operation's dimensional precondition failed.
    #[error("Matrix viability: {0}")]
    MatrixViability(String),

    /// A token could not be read as an infinite value.
    #[error("Not infinite: {0}")]
    Infinity(String),

    /// A cast could not parse a cell into the target kind.
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Index outside the current bounds.
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// No column carries the requested name.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// An insert would require fabricating sentinel-filled rows or columns.
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// A subset condition that cannot be evaluated.
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// Any other rejected argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TableError {
    /// Create a schema mismatch error.
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Self::DimensionMismatch { expected, found }
    }

    /// Create a missing value error.
    pub fn missing_value(msg: impl Into<String>) -> Self {
        Self::MissingValue(msg.into())
    }

    /// Create a matrix viability error.
    pub fn matrix_viability(msg: impl Into<String>) -> Self {
        Self::MatrixViability(msg.into())
    }

    /// Create a conversion error.
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// Create an out of bounds error.
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
