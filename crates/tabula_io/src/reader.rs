//! CSV ingestion.
//!
//! Every field is cleaned and kept as text, then handed to the core's bulk
//! ingestion path. Autoboxing afterwards casts the columns that scan as
//! numeric.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tabula_core::Table;
use tracing::{debug, info};

use crate::error::{IoError, Result};

/// Delimiters that clash with regex-style splitting or numeric signs.
pub const PROHIBITED_DELIMITERS: [char; 5] = ['\u{8}', '\\', '[', ']', '-'];

/// Token substituted for empty fields.
pub const EMPTY_FIELD: &str = "NA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReadOptions {
    pub delimiter: char,
    /// Treat the first record as column names
    pub headers: bool,
    /// Cast numeric-looking columns after ingestion
    pub autobox: bool,
    /// Push the final schema down into every row
    pub render_state: bool,
    /// Table name; defaults to the file stem
    pub name: Option<String>,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            headers: false,
            autobox: true,
            render_state: true,
            name: None,
        }
    }
}

impl CsvReadOptions {
    pub fn with_headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Check a delimiter and narrow it to the byte the csv crate expects.
pub fn validate_delimiter(delimiter: char) -> Result<u8> {
    if PROHIBITED_DELIMITERS.contains(&delimiter) || !delimiter.is_ascii() {
        return Err(IoError::InvalidDelimiter(delimiter));
    }
    Ok(delimiter as u8)
}

fn clean_field(field: &str) -> String {
    let cleaned: String = field.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        EMPTY_FIELD.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Read a delimited file into a table named after the file stem.
pub fn read_csv(path: &Path, options: &CsvReadOptions) -> Result<Table> {
    if !path.is_file() {
        return Err(IoError::NotAFile(path.to_path_buf()));
    }
    let name = options.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let file = File::open(path)?;
    let table = read_csv_from(BufReader::new(file), &name, options)?;
    info!(
        path = %path.display(),
        rows = table.nrow(),
        cols = table.ncol(),
        "loaded table"
    );
    Ok(table)
}

/// Read delimited records from any reader.
pub fn read_csv_from<R: Read>(reader: R, name: &str, options: &CsvReadOptions) -> Result<Table> {
    let delimiter = validate_delimiter(options.delimiter)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut headers: Option<Vec<String>> = None;
    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let fields: Vec<String> = record.iter().map(clean_field).collect();
        if options.headers && headers.is_none() {
            headers = Some(fields);
            continue;
        }
        if let Some(names) = &headers {
            if names.len() != fields.len() {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(idx as u64 + 1);
                return Err(IoError::header_mismatch(line, names.len(), fields.len()));
            }
        }
        records.push(fields);
    }

    let mut table = Table::from_text_records(name, records)?;
    if let Some(names) = headers {
        if !table.is_empty() {
            table.set_column_names(names)?;
        }
    }
    if options.autobox {
        let converted = table.autobox();
        debug!(table = %name, converted, "autoboxed csv columns");
    }
    if options.render_state {
        table.render_state()?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{Cell, Kind};

    #[test]
    fn test_rejects_prohibited_delimiters() {
        for d in PROHIBITED_DELIMITERS {
            assert!(matches!(
                validate_delimiter(d),
                Err(IoError::InvalidDelimiter(c)) if c == d
            ));
        }
        assert_eq!(validate_delimiter(';').unwrap(), b';');
        assert!(validate_delimiter('¦').is_err());
    }

    #[test]
    fn test_empty_fields_become_missing() {
        let data = "1,,x\n2,3,\n";
        let table = read_csv_from(data.as_bytes(), "t", &CsvReadOptions::default()).unwrap();
        assert_eq!(table.nrow(), 2);
        assert_eq!(table.get(0, 1).unwrap(), &Cell::Missing);
        assert_eq!(table.get(1, 1).unwrap(), &Cell::Integer(3));
        assert!(table.get(1, 2).unwrap().is_missing());
    }

    #[test]
    fn test_headers_name_columns() {
        let data = "id, score\n1, 1.5\n2, NA\n";
        let options = CsvReadOptions::default().with_headers(true);
        let table = read_csv_from(data.as_bytes(), "t", &options).unwrap();
        assert_eq!(table.column_names(), vec!["id", "score"]);
        assert_eq!(table.columns()[1].content_kind(), Some(Kind::Double));
        assert!(table.is_rendered());
        assert_eq!(table.rows()[1].schema().kinds(), &[Kind::Integer, Kind::Double]);
    }

    #[test]
    fn test_header_width_mismatch() {
        let data = "a,b\n1,2,3\n";
        let options = CsvReadOptions::default().with_headers(true);
        let err = read_csv_from(data.as_bytes(), "t", &options).unwrap_err();
        assert!(matches!(
            err,
            IoError::HeaderMismatch {
                headers: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_ragged_rows_without_headers() {
        let data = "1,2\n3\n";
        let err = read_csv_from(data.as_bytes(), "t", &CsvReadOptions::default()).unwrap_err();
        assert!(matches!(err, IoError::Table(_)));
    }

    #[test]
    fn test_autobox_can_be_disabled() {
        let options = CsvReadOptions {
            autobox: false,
            ..CsvReadOptions::default()
        };
        let table = read_csv_from("1;2\n".as_bytes(), "t", &options.with_delimiter(';')).unwrap();
        assert_eq!(table.get(0, 0).unwrap(), &Cell::from("1"));
    }
}
