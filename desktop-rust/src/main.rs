mod app;
mod canvas;
mod config;
mod io;
mod logging;
mod model;

use app::{configure_fonts, ViewerApp};
use config::ViewerConfig;

fn main() -> eframe::Result<()> {
    let (config, config_error) = match ViewerConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (ViewerConfig::default(), Some(err)),
    };
    if let Err(err) = logging::init(config.verbose) {
        eprintln!("{err:#}");
    }
    if let Some(err) = config_error {
        tracing::warn!("config ignored, using defaults: {err:#}");
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };
    eframe::run_native(
        "OCR Review",
        options,
        Box::new(|cc| {
            configure_fonts(&cc.egui_ctx);
            Box::new(ViewerApp::new(config, &cc.egui_ctx))
        }),
    )
}
