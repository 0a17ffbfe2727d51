//! Subcommand implementations.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tabula_core::{Column, ColumnSummary, Table};
use tabula_io::{
    read_csv, render_rows, save_table, write_delimited_file, write_html, CsvReadOptions,
    HtmlOptions, WriteOptions,
};
use tracing::{info, warn};

use crate::output::{format_stat, print_table};
use crate::{InputArgs, OutputFormat};

fn load(path: &Path, input: &InputArgs) -> Result<Table> {
    let options = CsvReadOptions {
        delimiter: input.delimiter,
        headers: !input.no_headers,
        autobox: !input.raw,
        render_state: true,
        name: None,
    };
    let table = read_csv(path, &options)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    for err in table.exception_log() {
        warn!(error = %err, "column kept as text");
    }
    Ok(table)
}

fn schema_rows(table: &Table) -> Vec<Vec<String>> {
    table
        .columns()
        .iter()
        .map(|column| {
            vec![
                column.name().to_string(),
                column
                    .content_kind()
                    .map_or_else(|| "undetermined".to_string(), |k| k.to_string()),
                column.count_missing_values().to_string(),
                column.width().to_string(),
            ]
        })
        .collect()
}

pub fn inspect(path: &Path, input: &InputArgs, rows: Option<usize>, schema_only: bool) -> Result<()> {
    let table = load(path, input)?;
    if !schema_only {
        let rows = rows.unwrap_or(table.options().default_head);
        print!("{}", render_rows(&table, rows));
        println!("[{} rows x {} columns]", table.nrow(), table.ncol());
    }
    print_table(&["column", "kind", "missing", "width"], schema_rows(&table));
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    table: &'a str,
    rows: usize,
    columns: Vec<ColumnSummary>,
}

fn summaries(table: &Table, column: Option<&str>) -> Result<Vec<ColumnSummary>> {
    match column {
        Some(name) => Ok(vec![table.column_by_name(name)?.summary()]),
        None => Ok(table.columns().iter().map(Column::summary).collect()),
    }
}

pub fn stats(path: &Path, input: &InputArgs, column: Option<&str>, json: bool) -> Result<()> {
    let table = load(path, input)?;
    let columns = summaries(&table, column)?;
    if json {
        let report = StatsReport {
            table: table.name(),
            rows: table.nrow(),
            columns,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let rows = columns
        .iter()
        .map(|s| {
            let mut row = vec![
                s.name.clone(),
                s.kind.map_or_else(|| "undetermined".to_string(), |k| k.to_string()),
                s.missing.to_string(),
            ];
            match &s.stats {
                Some(stats) => row.extend([
                    stats.sum.to_string(),
                    format_stat(stats.mean),
                    format_stat(stats.standard_deviation),
                    stats.min.to_string(),
                    stats.max.to_string(),
                ]),
                None => row.extend(std::iter::repeat("-".to_string()).take(5)),
            }
            row
        })
        .collect();
    print_table(
        &["column", "kind", "missing", "sum", "mean", "sd", "min", "max"],
        rows,
    );
    Ok(())
}

/// Output format implied by a file extension.
pub fn format_for(path: &Path) -> Option<OutputFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "csv" => Some(OutputFormat::Csv),
        "tsv" | "tab" => Some(OutputFormat::Tsv),
        "html" | "htm" => Some(OutputFormat::Html),
        "json" => Some(OutputFormat::Json),
        _ => None,
    }
}

pub fn convert(
    input_path: &Path,
    output_path: &Path,
    input: &InputArgs,
    format: Option<OutputFormat>,
    row_names: bool,
    complete_cases: bool,
) -> Result<()> {
    let Some(format) = format.or_else(|| format_for(output_path)) else {
        bail!(
            "Cannot infer an output format from {}; pass --to",
            output_path.display()
        );
    };
    let mut table = load(input_path, input)?;
    if complete_cases {
        let before = table.nrow();
        table = table.complete_cases();
        info!(dropped = before - table.nrow(), "dropped incomplete rows");
    }

    let delimited = |delimiter| WriteOptions {
        delimiter,
        headers: true,
        row_names,
    };
    match format {
        OutputFormat::Csv => write_delimited_file(&table, output_path, &delimited(','))?,
        OutputFormat::Tsv => write_delimited_file(&table, output_path, &delimited('\t'))?,
        OutputFormat::Html => {
            write_html(&table, output_path, &HtmlOptions::default())?;
        }
        OutputFormat::Json => save_table(&table, output_path)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args() -> InputArgs {
        InputArgs {
            delimiter: ',',
            no_headers: false,
            raw: false,
        }
    }

    #[test]
    fn test_format_for_extension() {
        assert_eq!(format_for(Path::new("a.CSV")), Some(OutputFormat::Csv));
        assert_eq!(format_for(Path::new("a.tsv")), Some(OutputFormat::Tsv));
        assert_eq!(format_for(Path::new("a.json")), Some(OutputFormat::Json));
        assert_eq!(format_for(Path::new("a")), None);
    }

    #[test]
    fn test_convert_drops_incomplete_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "id,score\n1,1.5\n2,\n3,3.0\n").unwrap();
        let output = dir.path().join("out.tsv");
        convert(&input, &output, &args(), None, false, true).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "id\tscore\n1\t1.5\n3\t3.0\n");
    }

    #[test]
    fn test_convert_needs_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "a\n1\n").unwrap();
        assert!(convert(&input, &dir.path().join("out"), &args(), None, false, false).is_err());
    }

    #[test]
    fn test_summaries_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "id,score\n1,1.5\n2,NA\n3,3.0\n").unwrap();
        let table = load(&input, &args()).unwrap();
        let only = summaries(&table, Some("score")).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].stats.as_ref().map(|s| s.mean), Some(2.25));
        assert!(summaries(&table, Some("nope")).is_err());
    }
}
