use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table,
};

use hpoa_core::{DiseaseOption, EditRecord, SessionState};
use hpoa_model::{AnnotationRow, Column};

use crate::types::{ApplyReport, SessionReport};

/// Columns shown by `view`; the rest are in the export.
const VIEW_COLUMNS: [Column; 7] = [
    Column::DatabaseId,
    Column::DiseaseName,
    Column::Qualifier,
    Column::HpoId,
    Column::Evidence,
    Column::Onset,
    Column::Frequency,
];

pub fn print_diseases(options: &[DiseaseOption]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Disease"),
        header_cell("Identifier"),
        header_cell("Annotations"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for option in options {
        table.add_row(vec![
            Cell::new(&option.disease_name),
            Cell::new(&option.database_id).fg(Color::Cyan),
            Cell::new(option.annotations),
        ]);
    }
    println!("{table}");
    println!("{} diseases", options.len());
}

/// `rows` pairs each row with its 1-based number in the working copy.
pub fn print_view<'a>(rows: impl Iterator<Item = (usize, &'a AnnotationRow)>, total: usize) {
    let mut table = Table::new();
    let mut header = vec![header_cell("#"), header_cell("Row")];
    header.extend(VIEW_COLUMNS.iter().map(|column| header_cell(column.label())));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    keep_unwrapped(&mut table, 1);

    let mut shown = 0usize;
    for (number, row) in rows {
        shown += 1;
        let mut cells = vec![dim_cell(number), dim_cell(row.id)];
        cells.extend(VIEW_COLUMNS.iter().map(|column| value_cell(row.get(*column))));
        table.add_row(cells);
    }
    println!("{table}");
    if shown < total {
        println!("{shown} of {total} matching rows shown");
    } else {
        println!("{total} matching rows");
    }
}

pub fn print_session_report(report: &SessionReport) {
    println!("Source: {}", report.source.display());
    println!(
        "Rows: {} in master, {} in working copy",
        report.master_rows, report.copy_rows
    );
    println!("State: {}", state_label(report.state));
    if let Some(export) = &report.export {
        println!("Exported ({}): {}", export.format, export.path.display());
    }
    if report.diff.is_empty() {
        println!("No changes.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Change"),
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Before"),
        header_cell("After"),
    ]);
    apply_diff_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    keep_unwrapped(&mut table, 1);
    for record in &report.diff {
        let row = dim_cell(record.row_id());
        let cells = match record {
            EditRecord::CellChanged {
                column,
                original,
                current,
                ..
            } => vec![
                Cell::new("changed").fg(Color::Yellow),
                row,
                Cell::new(column.name()),
                value_cell(original),
                value_cell(current).add_attribute(Attribute::Bold),
            ],
            EditRecord::RowAdded { row: added } => vec![
                Cell::new("added").fg(Color::Green),
                row,
                Cell::new(added.database_id()),
                dim_cell("-"),
                Cell::new(added.get(Column::HpoId)).add_attribute(Attribute::Bold),
            ],
            EditRecord::RowRemoved { row: removed } => vec![
                Cell::new("removed").fg(Color::Red),
                row,
                Cell::new(removed.database_id()),
                Cell::new(removed.get(Column::HpoId)),
                dim_cell("-"),
            ],
        };
        table.add_row(cells);
    }
    println!("{table}");
    println!("{} changes", report.diff.len());
}

pub fn print_apply_report(report: &ApplyReport) {
    let summary = &report.summary;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Suggestions"),
        header_cell("Added"),
        header_cell("Changed"),
        header_cell("Removed"),
        header_cell("Unmatched removals"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.suggestions).add_attribute(Attribute::Bold),
        count_cell(summary.added, Color::Green),
        count_cell(summary.changed, Color::Yellow),
        count_cell(summary.removed, Color::Red),
        count_cell(summary.unmatched_removals, Color::Magenta),
    ]);
    println!("{table}");
    print_session_report(&report.session);
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_diff_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Clean => "clean",
        SessionState::Dirty => "dirty (differs from master)",
    }
}

/// Keeps full row ids on one line for pasting into `--set` and `--remove`.
fn keep_unwrapped(table: &mut Table, index: usize) {
    if let Some(column) = table.column_mut(index) {
        column.set_constraint(ColumnConstraint::ContentWidth);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn value_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
