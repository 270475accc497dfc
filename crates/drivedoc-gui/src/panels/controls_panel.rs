/// Controls: the autostart checkbox and the update button.
use crate::state::AppState;
use egui::Ui;

pub fn controls_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        let mut autostart = state.settings.autostart;
        if ui
            .checkbox(&mut autostart, "Run documentation updater at App-start")
            .changed()
        {
            state.set_autostart(autostart);
        }

        ui.add_space(6.0);

        let button = egui::Button::new("Scan Drives & Update Documentation");
        if ui
            .add_enabled(!state.is_busy(), button)
            .on_disabled_hover_text("An update is running")
            .clicked()
        {
            state.start_update();
        }
    });
}
