//! Delimited and HTML output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tabula_core::Table;
use tracing::info;

use crate::error::{IoError, Result};
use crate::reader::validate_delimiter;

/// Top-left cell of the header line when row names are written.
pub const ROW_NAME_CORNER: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub delimiter: char,
    /// Emit a header line of column names
    pub headers: bool,
    /// Prefix every line with the row name
    pub row_names: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            headers: true,
            row_names: false,
        }
    }
}

/// Write `table` as delimited text. Cells render the way they display, so
/// sentinels come out as `NA` and `Infinity`.
pub fn write_delimited<W: Write>(table: &Table, writer: W, options: &WriteOptions) -> Result<()> {
    let delimiter = validate_delimiter(options.delimiter)?;
    let mut out = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    if table.is_empty() {
        out.flush()?;
        return Ok(());
    }
    if options.headers {
        let mut header = Vec::with_capacity(table.ncol() + 1);
        if options.row_names {
            header.push(ROW_NAME_CORNER.to_string());
        }
        header.extend(table.column_names());
        out.write_record(&header)?;
    }
    for row in table.rows() {
        let mut record = Vec::with_capacity(row.len() + 1);
        if options.row_names {
            record.push(row.name().to_string());
        }
        record.extend(row.iter().map(ToString::to_string));
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_delimited_file(table: &Table, path: &Path, options: &WriteOptions) -> Result<()> {
    if path.is_dir() {
        return Err(IoError::NotAFile(path.to_path_buf()));
    }
    let file = File::create(path)?;
    write_delimited(table, BufWriter::new(file), options)?;
    info!(path = %path.display(), rows = table.nrow(), "wrote delimited table");
    Ok(())
}

// =============================================================================
// HTML
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    table_class: String,
    caption: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            table_class: "table".to_string(),
            caption: None,
        }
    }
}

impl HtmlOptions {
    /// Set the `class` attribute. Quotes and angle brackets are stripped; an
    /// empty class keeps the current one.
    pub fn with_table_class(mut self, class: &str) -> Self {
        let class: String = class
            .chars()
            .filter(|c| !matches!(c, '"' | '\'' | '<' | '>'))
            .collect();
        if !class.is_empty() {
            self.table_class = class;
        }
        self
    }

    /// Set the caption. An empty caption falls back to the table name.
    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = (!caption.is_empty()).then(|| caption.to_string());
        self
    }

    pub fn table_class(&self) -> &str {
        &self.table_class
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_html(table: &Table, options: &HtmlOptions) -> String {
    let caption = options.caption.as_deref().unwrap_or(table.name());
    let mut html = format!("<table class=\"{}\">\n", options.table_class);
    html.push_str(&format!("\t<caption>{}</caption>\n", escape_html(caption)));

    html.push_str("\t<tr>\n");
    for name in table.column_names() {
        html.push_str(&format!("\t\t<th>{}</th>\n", escape_html(&name)));
    }
    html.push_str("\t</tr>\n");

    for row in table.rows() {
        html.push_str("\t<tr>\n");
        for cell in row {
            html.push_str(&format!("\t\t<td>{}</td>\n", escape_html(&cell.to_string())));
        }
        html.push_str("\t</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

/// Write an HTML table, appending `.html` to the path when it lacks that
/// extension. Returns the path written.
pub fn write_html(table: &Table, path: &Path, options: &HtmlOptions) -> Result<PathBuf> {
    let path = if path.extension().map_or(false, |ext| ext == "html") {
        path.to_path_buf()
    } else {
        let mut with_ext = path.as_os_str().to_owned();
        with_ext.push(".html");
        PathBuf::from(with_ext)
    };
    if path.is_dir() {
        return Err(IoError::NotAFile(path));
    }
    std::fs::write(&path, render_html(table, options))?;
    info!(path = %path.display(), rows = table.nrow(), "wrote html table");
    Ok(path)
}
