use eframe::egui::{self, Color32, ScrollArea, Ui};

use crate::charts::spec::AxisScale;
use crate::charts::{ChartSpec, map, scatter, time_series};
use crate::data::filter::group_by_state;
use crate::data::schema::TOTAL_CRIMES;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

/// Series colors carried over from the original dashboard styling.
const SECONDARY_COLOR: Color32 = Color32::from_rgb(84, 39, 143);
const TOTAL_COLOR: Color32 = Color32::from_rgb(142, 109, 37);

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CrimeDashApp {
    pub state: AppState,
}

impl Default for CrimeDashApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for CrimeDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and variable pickers ----
        egui::SidePanel::left("controls_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and data table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            self.central_panel(ui);
        });
    }
}

impl CrimeDashApp {
    /// Rebuild every chart spec from the current filtered table and render
    /// them. Building is cheap at this data size and keeps each chart in
    /// lockstep with the selection with no cache to invalidate.
    fn central_panel(&mut self, ui: &mut Ui) {
        let state = &self.state;
        let Some(filtered) = &state.filtered else {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset to begin  (File → Open…)");
            });
            return;
        };

        let active = state.active_crime_types();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                ui.columns(2, |cols: &mut [Ui]| {
                    let map_spec = group_by_state(filtered)
                        .and_then(|grouped| map::build(&grouped, &active));
                    show_chart(&mut cols[0], "state_map", map_spec);

                    show_chart(
                        &mut cols[1],
                        "var1_series",
                        time_series::build(
                            filtered,
                            &state.var1.column,
                            state.var1.scale,
                            state.var1.agg,
                            None,
                            &state.var1.column,
                            None,
                        ),
                    );
                    show_chart(
                        &mut cols[1],
                        "var2_series",
                        time_series::build(
                            filtered,
                            &state.var2.column,
                            state.var2.scale,
                            state.var2.agg,
                            None,
                            &state.var2.column,
                            Some(SECONDARY_COLOR),
                        ),
                    );
                });

                ui.separator();

                ui.columns(2, |cols: &mut [Ui]| {
                    show_chart(
                        &mut cols[0],
                        "scatter1",
                        scatter::build(filtered, &state.var1.column, state.var1.scale, None),
                    );
                    show_chart(
                        &mut cols[1],
                        "scatter2",
                        scatter::build(
                            filtered,
                            &state.var2.column,
                            state.var2.scale,
                            Some(SECONDARY_COLOR),
                        ),
                    );
                });

                ui.separator();

                show_chart(
                    ui,
                    "total_series",
                    time_series::build(
                        filtered,
                        TOTAL_CRIMES,
                        AxisScale::Linear,
                        state.crime_agg,
                        state.marker_year,
                        "Total Crimes",
                        Some(TOTAL_COLOR),
                    ),
                );

                ui.separator();

                egui::CollapsingHeader::new("Filtered rows")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        table::data_table(ui, filtered);
                    });
            });
    }
}

fn show_chart(ui: &mut Ui, id: &str, spec: anyhow::Result<ChartSpec>) {
    match spec {
        Ok(spec) => plot::chart(ui, id, &spec),
        Err(e) => {
            log::error!("chart '{id}' failed: {e:#}");
            ui.label(format!("Chart unavailable: {e:#}"));
        }
    }
}
