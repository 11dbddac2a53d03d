use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use genepi_cli::check::CheckReport;
use genepi_model::Location;
use genepi_validate::ImportSummary;

pub fn print_report(report: &CheckReport) {
    let summary = &report.summary;
    println!("File: {}", summary.filename);
    println!("Workflow: {}", report.workflow);
    if summary.show_success_notice() {
        println!("Imported {} samples without errors.", summary.imported);
    } else {
        println!("Imported {} samples.", summary.imported);
    }
    print_errors(summary);
    print_warnings(summary);
    print_reconciliation(summary);
    print_form(report);
}

fn print_errors(summary: &ImportSummary) {
    if summary.errors.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Problem"),
        header_cell("Count"),
        header_cell("Values"),
    ]);
    apply_report_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for group in &summary.errors {
        table.add_row(vec![
            Cell::new(group.code).fg(Color::Red).add_attribute(Attribute::Bold),
            Cell::new(group.headline),
            count_cell(group.count, Color::Red),
            Cell::new(group.values.join(", ")),
        ]);
    }
    println!();
    println!("Errors ({}):", summary.error_count());
    println!("{table}");
}

fn print_warnings(summary: &ImportSummary) {
    if summary.warnings.is_empty() && summary.unknown_fields.is_none() {
        return;
    }
    println!();
    println!("Warnings ({}):", summary.warning_count());
    if let Some(headers) = &summary.unknown_fields {
        println!("- Columns not in the template were ignored: {}", headers.join(", "));
    }
    for group in &summary.warnings {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Sample"),
            header_cell("Column"),
            header_cell("Original"),
            header_cell("Corrected"),
        ]);
        apply_report_style(&mut table);
        for detail in &group.details {
            table.add_row(vec![
                Cell::new(&detail.identifier),
                Cell::new(detail.column),
                Cell::new(&detail.original),
                value_cell(&detail.corrected),
            ]);
        }
        println!(
            "{} [{}] affects {} samples",
            group.headline, group.code, group.count
        );
        println!("{table}");
    }
}

fn print_reconciliation(summary: &ImportSummary) {
    if summary.completely_unused && summary.imported > 0 {
        println!();
        println!("None of the samples in this file match the expected samples.");
    }
    if !summary.extraneous.is_empty() {
        println!("Not expected, ignored: {}", summary.extraneous.join(", "));
    }
    if !summary.absent.is_empty() {
        println!("Expected but missing from file: {}", summary.absent.join(", "));
    }
}

fn print_form(report: &CheckReport) {
    let form = &report.form;
    let counts = form
        .status_counts
        .iter()
        .map(|(status, count)| format!("{status}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!();
    println!("Rows: {} ({counts})", form.rows);
    if form.invalid_rows.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sample"),
        header_cell("Column"),
        header_cell("Problem"),
    ]);
    apply_report_style(&mut table);
    for row in &form.invalid_rows {
        for (column, message) in &row.errors {
            table.add_row(vec![
                Cell::new(&row.identifier).fg(Color::Blue),
                Cell::new(column),
                Cell::new(message).fg(Color::Red),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_locations(resolved: &[(&str, Option<Location>)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Query"),
        header_cell("Id"),
        header_cell("Location"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (query, location) in resolved {
        match location {
            Some(location) => table.add_row(vec![
                Cell::new(query),
                Cell::new(location.id),
                Cell::new(location.path()).fg(Color::Green),
            ]),
            None => table.add_row(vec![Cell::new(query), dim_cell("-"), dim_cell("no match")]),
        };
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_report_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
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

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn value_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("(none)")
    } else {
        Cell::new(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
