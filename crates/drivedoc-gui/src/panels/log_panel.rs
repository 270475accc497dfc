/// Log pane: every message of the session, newest at the bottom.
use crate::state::AppState;
use crate::theme::DriveDocTheme;
use egui::Ui;

pub fn log_panel(ui: &mut Ui, state: &AppState, theme: &DriveDocTheme) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for line in &state.log {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(line.time.format("%H:%M:%S").to_string())
                            .monospace()
                            .size(11.0)
                            .color(theme.text_muted),
                    );
                    ui.label(
                        egui::RichText::new(&line.text)
                            .size(12.0)
                            .color(theme.log_color(line.level)),
                    );
                });
            }
        });
}
