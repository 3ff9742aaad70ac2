use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use sheetform_model::{ColumnHint, FieldType, PersistedForm, RawSheet, SheetTable};

pub fn sheets_table(table: &SheetTable) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Sheet"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Ragged"),
    ]);
    apply_table_style(&mut out);
    align_column(&mut out, 1, CellAlignment::Right);
    align_column(&mut out, 2, CellAlignment::Right);
    align_column(&mut out, 3, CellAlignment::Center);
    for (name, sheet) in table.iter() {
        out.add_row(vec![
            Cell::new(name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(sheet.height()),
            Cell::new(sheet.width()),
            if sheet.is_ragged() {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                dim_cell("-")
            },
        ]);
    }
    out
}

/// The header row plus the first `limit` data rows, numbered from 0.
pub fn preview_table(sheet: &RawSheet, limit: usize) -> Table {
    let mut out = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(sheet.headers.iter().map(String::as_str).map(header_cell));
    out.set_header(header);
    apply_table_style(&mut out);
    align_column(&mut out, 0, CellAlignment::Right);
    for row in 0..sheet.height().min(limit) {
        let mut cells = vec![dim_cell(row)];
        cells.extend((0..sheet.width()).map(|column| Cell::new(sheet.cell(row, column))));
        out.add_row(cells);
    }
    out
}

pub fn hints_table(sheet: &RawSheet, hints: &[ColumnHint]) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Column"),
        header_cell("Header"),
        header_cell("Numeric"),
        header_cell("Unique"),
        header_cell("Empty"),
    ]);
    apply_table_style(&mut out);
    for index in [0, 3, 4] {
        align_column(&mut out, index, CellAlignment::Right);
    }
    align_column(&mut out, 2, CellAlignment::Center);
    for (column, hint) in hints.iter().enumerate() {
        out.add_row(vec![
            dim_cell(column),
            Cell::new(sheet.header(column).unwrap_or_default()),
            if hint.is_numeric {
                Cell::new("✓").fg(Color::Green)
            } else {
                dim_cell("-")
            },
            Cell::new(percent(hint.unique_ratio)),
            Cell::new(percent(hint.null_ratio)),
        ]);
    }
    out
}

pub fn field_types_table() -> Table {
    let mut out = Table::new();
    out.set_header(vec![header_cell("Type"), header_cell("Label")]);
    apply_table_style(&mut out);
    for field_type in FieldType::ALL {
        out.add_row(vec![
            Cell::new(field_type.as_str()).add_attribute(Attribute::Bold),
            Cell::new(field_type.label()),
        ]);
    }
    out
}

pub fn fields_table(form: &PersistedForm) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Key"),
        header_cell("Title"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut out);
    for field in &form.fields {
        let type_cell = if field.field_type == FieldType::Text {
            dim_cell(field.field_type)
        } else {
            Cell::new(field.field_type).fg(Color::Green)
        };
        out.add_row(vec![dim_cell(&field.key), Cell::new(&field.title), type_cell]);
    }
    out
}

/// Summary printed after a form has been written to `path`.
pub fn print_form_summary(form: &PersistedForm, path: &Path) {
    println!(
        "Form: {} ({})",
        form.form_info.form_name, form.form_info.form_group
    );
    println!("Output: {}", path.display());
    println!(
        "{} rows across {} fields",
        form.metadata.total_rows,
        form.fields.len()
    );
    println!("{}", fields_table(form));
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
