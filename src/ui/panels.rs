use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Slider, Ui};

use crate::charts::spec::{AggMode, AxisScale};
use crate::color::generate_palette;
use crate::data::schema::{VARIABLES, crime_type_labels};
use crate::state::{AppState, VariableSelection};

// ---------------------------------------------------------------------------
// Left side panel – filter and variable controls
// ---------------------------------------------------------------------------

/// Render the left controls panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    let logo = egui::include_image!("../../assets/logo.png");
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(logo)
                .max_width(ui.available_width() * 0.8)
                .max_height(120.0)
                .rounding(4.0),
        );
    });
    ui.add_space(4.0);

    ui.heading("Controls");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            crime_type_checks(ui, state);
            ui.separator();

            ui.strong("Variable 1");
            variable_picker(ui, "variable1", &mut state.var1);
            ui.add_space(4.0);
            ui.strong("Variable 2");
            variable_picker(ui, "variable2", &mut state.var2);
            ui.separator();

            state_checks(ui, state);
            ui.separator();

            year_controls(ui, state);
            ui.separator();

            ui.strong("Total crimes aggregation");
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut state.crime_agg, AggMode::Avg, AggMode::Avg.label());
                ui.radio_value(&mut state.crime_agg, AggMode::Sum, AggMode::Sum.label());
            });
        });
}

/// Crime-type checkboxes with a color swatch per type.
fn crime_type_checks(ui: &mut Ui, state: &mut AppState) {
    let labels = crime_type_labels();
    let palette = generate_palette(labels.len());

    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!(
            "Crime Types  ({}/{})",
            state.crime_checks.len(),
            labels.len()
        ));
        if ui.small_button("All").clicked() {
            state.select_all_crime_types();
        }
        if ui.small_button("None").clicked() {
            state.select_no_crime_types();
        }
    });

    for (label, color) in labels.iter().zip(palette) {
        let mut checked = state.crime_checks.contains(label);
        let text = RichText::new(label).color(color);
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_crime_type(label);
        }
    }
}

/// One variable dropdown with its Linear/Log and Avg/Sum rows.
fn variable_picker(ui: &mut Ui, id: &str, selection: &mut VariableSelection) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(selection.column.clone())
        .show_ui(ui, |ui: &mut Ui| {
            for var in VARIABLES {
                if ui
                    .selectable_label(selection.column == var, var)
                    .clicked()
                {
                    selection.column = var.to_string();
                }
            }
        });
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut selection.scale, AxisScale::Linear, AxisScale::Linear.label());
        ui.radio_value(&mut selection.scale, AxisScale::Log, AxisScale::Log.label());
        ui.separator();
        ui.radio_value(&mut selection.agg, AggMode::Avg, AggMode::Avg.label());
        ui.radio_value(&mut selection.agg, AggMode::Sum, AggMode::Sum.label());
    });
}

/// Collapsible state multi-select.
fn state_checks(ui: &mut Ui, state: &mut AppState) {
    let header = format!(
        "States  ({}/{})",
        state.state_checks.len(),
        state.all_states.len()
    );
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("state_checks")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_states();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_states();
                }
            });
            let all_states: Vec<String> = state.all_states.iter().cloned().collect();
            for abbrev in all_states {
                let mut checked = state.state_checks.contains(&abbrev);
                if ui.checkbox(&mut checked, &abbrev).changed() {
                    state.toggle_state(&abbrev);
                }
            }
        });
}

/// Year slider plus the optional marker-year input.
fn year_controls(ui: &mut Ui, state: &mut AppState) {
    let (min_year, max_year) = state.year_bounds;

    ui.strong("Year range");
    let mut year = state.max_year;
    if ui
        .add(Slider::new(&mut year, min_year..=max_year).text("up to"))
        .changed()
    {
        state.set_max_year(year);
    }
    ui.add_space(4.0);

    ui.strong("Marker year");
    let mut enabled = state.marker_year.is_some();
    ui.horizontal(|ui: &mut Ui| {
        if ui.checkbox(&mut enabled, "draw line").changed() {
            state.marker_year = enabled.then_some(state.max_year);
        }
        if let Some(marker) = &mut state.marker_year {
            ui.add(DragValue::new(marker).range(min_year..=max_year));
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(filtered)) = (&state.table, &state.filtered) {
            ui.label(format!(
                "{} rows loaded, {} match the current filters",
                table.len(),
                filtered.len()
            ));
        }

        ui.separator();

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open crime dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows spanning {:?} states",
                    table.len(),
                    crate::data::filter::active_states(&table).len()
                );
                state.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                state.status_message = Some(format!("Error: {e}"));
                state.loading = false;
            }
        }
    }
}
