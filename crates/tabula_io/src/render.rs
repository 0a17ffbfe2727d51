//! Plain-text console rendering governed by a table's options.

use tabula_core::Table;

/// Render every row, cut off at `max.print`.
pub fn render(table: &Table) -> String {
    render_rows(table, table.nrow())
}

/// Render the first `default.head` rows.
pub fn render_head(table: &Table) -> String {
    render_rows(table, table.options().default_head)
}

/// Render up to `rows` rows.
///
/// Each column is left-aligned and padded to its widest cell plus
/// `col.whitespace`. Column names count towards the width only when they are
/// printed. The table name line and the column name
/// line follow the two print flags. An empty table renders as nothing.
pub fn render_rows(table: &Table, rows: usize) -> String {
    if table.is_empty() {
        return String::new();
    }
    let options = table.options();
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|c| {
            let width = if options.print_col_names == 1 {
                c.width()
            } else {
                c.iter().map(|cell| cell.to_string().chars().count()).max().unwrap_or(0)
            };
            width + options.col_whitespace
        })
        .collect();

    let mut lines = Vec::new();
    if options.print_table_name == 1 {
        lines.push(format!("# -- {} -- #", table.name()));
    }
    if options.print_col_names == 1 {
        lines.push(pad_line(table.column_names(), &widths));
    }
    let shown = rows.min(table.nrow());
    for row in table.rows().iter().take(shown.min(options.max_print)) {
        lines.push(pad_line(row.iter().map(ToString::to_string), &widths));
    }
    if shown > options.max_print {
        lines.push(format!(
            " [ reached max.print -- omitted {} rows ]",
            shown - options.max_print
        ));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn pad_line<I, S>(fields: I, widths: &[usize]) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (field, &width) in fields.into_iter().zip(widths) {
        line.push_str(&format!("{:<width$}", field.as_ref(), width = width));
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{Cell, Column, Matrix, Row};

    fn sample() -> Table {
        Table::from_columns(
            "t",
            vec![
                Column::from_values("id", [1i64, 22, 3]).unwrap(),
                Column::from_cells("v", vec![Cell::Missing, Cell::Double(0.5), Cell::Double(2.0)])
                    .unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_render_pads_columns() {
        let out = render(&sample());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "# -- t -- #");
        assert_eq!(lines[1], "id    v");
        assert_eq!(lines[2], "1     NA");
        assert_eq!(lines[3], "22    0.5");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_max_print_cuts_off() {
        let mut table = sample();
        table.set_option("max.print", 1).unwrap();
        let out = render(&table);
        assert!(out.contains("omitted 2 rows"));
        assert_eq!(render_head(&table).lines().count(), 4);
    }

    #[test]
    fn test_matrix_hides_names() {
        let m = Matrix::from_rows("m", vec![Row::from_values("r", [1i64, 2])]).unwrap();
        assert_eq!(render(&m), "1    2\n");
    }

    #[test]
    fn test_empty_renders_nothing() {
        assert_eq!(render(&Table::new("e")), "");
    }
}
