// src/main.rs
use eframe::egui;
use anyhow::{Context, Result};
use std::path::PathBuf;

use hygiene_eda::config::Settings;
use hygiene_eda::file::{FileHandler, SettingsFileHandler};
use hygiene_eda::logging;

mod app;
mod ui;

use app::HygieneApp;

fn main() -> Result<()> {
    let settings_path = Settings::default_path();
    let mut settings = SettingsFileHandler::new()
        .load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    // An explicit data file on the command line wins over the settings
    if let Some(path) = std::env::args_os().nth(1) {
        settings.data_path = PathBuf::from(path);
    }

    logging::init_logger(settings.log_filter());
    logging::log_settings(&settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Hygiène PME"),
        ..Default::default()
    };

    eframe::run_native(
        "Hygiène PME",
        options,
        Box::new(|_cc| Box::new(HygieneApp::new(settings))),
    ).map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
