//! DriveDoc: documents the project folders on external drives.
//!
//! Thin binary entry point. All logic lives in the `drivedoc-core`
//! and `drivedoc-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use drivedoc_core::settings::{Settings, SETTINGS_FILE};
use drivedoc_core::store::DEFAULT_SPREADSHEET_NAME;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("DriveDoc starting");

    let settings_path = PathBuf::from(SETTINGS_FILE);
    let settings = Settings::load_or_create(&settings_path)?;
    let size = [settings.window_width as f32, settings.window_height as f32];

    // Build state before the window so an autostarted update is already
    // running on the first frame.
    let state =
        drivedoc_gui::DriveDocState::build(settings, settings_path, DEFAULT_SPREADSHEET_NAME.to_string());

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Drives Documentation Updater")
            .with_inner_size(size)
            .with_min_inner_size([360.0, 240.0])
            .with_icon(drivedoc_gui::icon::generate_icon(64)),
        ..Default::default()
    };

    eframe::run_native(
        "DriveDoc",
        options,
        Box::new(|cc| Ok(Box::new(drivedoc_gui::DriveDocApp::with_state(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
