use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Filtered-rows table (bottom of the central panel)
// ---------------------------------------------------------------------------

/// Render the currently filtered rows as a scrollable grid.
/// This is the same snapshot every chart is computed from.
pub fn data_table(ui: &mut Ui, table: &Table) {
    if table.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto(), table.columns().len())
        .header(20.0, |mut header| {
            for name in table.columns() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            let rows = table.rows();
            body.rows(18.0, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for value in cells {
                    row.col(|ui| {
                        ui.label(value.to_string());
                    });
                }
            });
        });
}
