/// Bottom status bar: whether an update is running and its current stage.
use crate::state::AppState;
use crate::theme::DriveDocTheme;
use egui::Ui;

pub fn status_bar(ui: &mut Ui, state: &AppState, theme: &DriveDocTheme) {
    ui.horizontal(|ui| {
        if state.is_busy() {
            ui.spinner();
            let stage = state.current_stage.as_deref().unwrap_or("Starting process...");
            ui.label(egui::RichText::new(stage).size(12.0).color(theme.text));
        } else {
            ui.label(egui::RichText::new("Ready").size(12.0).color(theme.text_muted));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                    .size(11.0)
                    .color(theme.text_muted),
            );
        });
    });
}
