/// Installer: shown until the service account key has been installed.
use crate::state::AppState;
use egui::Ui;

pub fn installer_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        let button = egui::Button::new("Install Program");
        if ui
            .add_enabled(!state.installer_finished, button)
            .on_hover_text(format!(
                "Moves service_account.json from {} to its configuration folder",
                state.install_source.display()
            ))
            .clicked()
        {
            state.run_installer();
        }
    });
}
