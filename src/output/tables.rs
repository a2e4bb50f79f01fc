use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::models::{DevOpsStatus, StatusRecord};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cells(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn color_coded_status_cell(status: DevOpsStatus) -> Cell {
    let cell = Cell::new(status.label());
    match status {
        DevOpsStatus::Success => cell.fg(TableColor::Green),
        DevOpsStatus::InProgress => cell.fg(TableColor::Yellow),
        DevOpsStatus::Fail | DevOpsStatus::Error => cell.fg(TableColor::Red),
        DevOpsStatus::Unknown => cell.fg(TableColor::DarkGrey),
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_build_number(record: &StatusRecord) -> String {
    if record.build_number == 0 {
        "-".to_string()
    } else {
        format!("#{}", record.build_number)
    }
}

/// Drops cell colors when the table is not headed for a terminal.
pub fn apply_styling(table: &mut Table, styled: bool) {
    if !styled {
        table.force_no_tty();
    }
}

/// One row per record, in record order.
pub fn status_table(records: &[StatusRecord], styled: bool) -> Table {
    let mut table = create_table();
    apply_styling(&mut table, styled);
    table.set_header(header_cells(&[
        "Alias",
        "Repository",
        "Branch",
        "Build",
        "Status",
        "Started",
        "Last success seen",
    ]));

    for record in records {
        table.add_row(vec![
            Cell::new(&record.alias),
            Cell::new(&record.repository_name),
            Cell::new(&record.branch),
            Cell::new(format_build_number(record)),
            color_coded_status_cell(record.status),
            Cell::new(format_time(record.build_time)),
            Cell::new(format_time(record.last_seen_successful_build)),
        ]);
    }

    table
}
