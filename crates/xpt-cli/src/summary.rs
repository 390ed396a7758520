//! Table and JSON rendering of decoded files.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use xpt_reader::{Value, VarType, XptTable};

/// Variable listing: one line per column in output order.
pub fn schema_table(table: &XptTable) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("#"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Length"),
        header_cell("Varnum"),
        header_cell("Label"),
    ]);
    apply_schema_table_style(&mut out);
    align_column(&mut out, 0, CellAlignment::Right);
    align_column(&mut out, 2, CellAlignment::Center);
    align_column(&mut out, 3, CellAlignment::Right);
    align_column(&mut out, 4, CellAlignment::Right);

    for (idx, var) in table.variables.iter().enumerate() {
        out.add_row(vec![
            dim_cell(idx + 1),
            Cell::new(&var.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            type_cell(var.var_type),
            Cell::new(var.length),
            Cell::new(var.varnum),
            if var.label.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(&var.label)
            },
        ]);
    }
    out
}

/// Data listing with at most `limit` rows.
pub fn rows_table(table: &XptTable, limit: Option<usize>) -> Table {
    let mut out = Table::new();
    out.set_header(table.header().iter().map(|name| header_cell(name)));
    apply_rows_table_style(&mut out);
    for (idx, var) in table.variables.iter().enumerate() {
        if var.var_type == VarType::Numeric {
            align_column(&mut out, idx, CellAlignment::Right);
        }
    }

    let shown = limit.unwrap_or(table.rows.len());
    for row in table.rows.iter().take(shown) {
        out.add_row(row.iter().map(value_cell));
    }
    out
}

/// JSON array of arrays: the names, then at most `limit` rows.
///
/// Missing numerics are written as `null`.
pub fn rows_json(table: XptTable, limit: Option<usize>) -> serde_json::Result<String> {
    let mut rows = table.into_rows();
    if let Some(limit) = limit {
        rows.truncate(limit.saturating_add(1));
    }
    serde_json::to_string_pretty(&rows)
}

/// One-line description printed under a table.
pub fn footer(table: &XptTable, limit: Option<usize>) -> String {
    let total = table.num_rows();
    let mut line = match limit {
        Some(limit) if limit < total => {
            format!("{limit} of {total} rows, {} columns", table.num_columns())
        }
        _ => format!("{total} rows, {} columns", table.num_columns()),
    };
    if table.trailing_bytes > 0 {
        line.push_str(&format!(
            " ({} trailing bytes ignored)",
            table.trailing_bytes
        ));
    }
    line
}

fn apply_schema_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_rows_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(200);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn value_cell(value: &Value) -> Cell {
    if value.is_missing() {
        dim_cell(value)
    } else {
        Cell::new(value)
    }
}

fn type_cell(var_type: VarType) -> Cell {
    match var_type {
        VarType::Numeric => Cell::new(var_type).fg(Color::Green),
        VarType::Character => Cell::new(var_type).fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
