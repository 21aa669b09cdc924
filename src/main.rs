mod app;
mod color;
mod data;
mod forecast;
mod pipeline;
mod state;
mod stats;
mod ui;

use app::DashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Urban Sustainability Monitor",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::default()))),
    )
}
