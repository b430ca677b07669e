mod app;
mod charts;
mod color;
mod data;
mod state;
mod ui;

use app::CrimeDashApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Crime Analysis Dashboard",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the png logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);

            let mut app = CrimeDashApp::default();
            // The dataset lives at a fixed relative path; a missing file is
            // not fatal since the user can still File → Open.
            match data::loader::load_default() {
                Ok(table) => {
                    log::info!("Loaded {} rows from {}", table.len(), data::loader::DEFAULT_DATA_PATH);
                    app.state.set_table(table);
                }
                Err(e) => {
                    log::warn!("Startup load skipped: {e}");
                    app.state.status_message = Some(format!("{e}"));
                }
            }
            Ok(Box::new(app))
        }),
    )
}
