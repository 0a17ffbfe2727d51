//! File and console surfaces for tabula tables.
//!
//! The core crate knows nothing about files. This crate reads delimited text
//! through the core's bulk ingestion path, writes delimited and HTML output,
//! snapshots tables and matrices as JSON, and renders them for a terminal.

pub mod error;
pub mod persist;
pub mod reader;
pub mod render;
pub mod writer;

pub use error::{IoError, Result};
pub use persist::{load_matrix, load_table, save_matrix, save_table};
pub use reader::{read_csv, read_csv_from, validate_delimiter, CsvReadOptions};
pub use render::{render, render_head, render_rows};
pub use writer::{
    render_html, write_delimited, write_delimited_file, write_html, HtmlOptions, WriteOptions,
};
