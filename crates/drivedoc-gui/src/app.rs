/// Main `eframe::App` implementation for DriveDoc.
///
/// One window: the log pane fills the centre, the controls sit below it
/// (replaced by the installer button until the key is installed), and a
/// status bar at the very bottom.
use crate::panels;
use crate::state::{spreadsheet_job, AppState};
use crate::theme::DriveDocTheme;
use crate::widgets;
use drivedoc_core::settings::Settings;
use std::path::PathBuf;

/// Pre-built application state.
///
/// Construct this before calling `eframe::run_native` so an autostarted
/// update is already running when the first frame is drawn.
pub struct DriveDocState {
    pub(crate) inner: AppState,
}

impl DriveDocState {
    pub fn build(settings: Settings, settings_path: PathBuf, spreadsheet: String) -> Self {
        let mut state = AppState::new(settings, settings_path, spreadsheet_job(spreadsheet));
        if state.settings.autostart && state.can_update() {
            state.start_update();
        }
        Self { inner: state }
    }
}

pub struct DriveDocApp {
    state: AppState,
    theme: DriveDocTheme,
}

impl DriveDocApp {
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: DriveDocState) -> Self {
        let theme = DriveDocTheme::dark();
        theme.apply(&cc.egui_ctx);
        Self {
            state: state.inner,
            theme,
        }
    }

    fn quit_dialog(&mut self, ctx: &egui::Context) {
        if !self.state.show_quit_confirm {
            return;
        }
        egui::Window::new("Quit?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size([320.0, 0.0])
            .show(ctx, |ui| {
                ui.label(
                    "Quitting while the documentation is updating may result in an \
                     empty documentation.\n\n\
                     (You can restore it from the Spreadsheet history.)\n\n\
                     Are you sure you want to quit?",
                );
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        self.state.confirm_quit();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    if ui.button("No").clicked() {
                        self.state.cancel_quit();
                    }
                });
            });
    }
}

impl eframe::App for DriveDocApp {
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.process_messages();
        if self.state.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        if ctx.input(|i| i.viewport().close_requested()) && !self.state.request_close() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state, &self.theme);
                ui.add_space(2.0);
            });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(8.0);
            if self.state.can_update() {
                panels::controls_panel::controls_panel(ui, &mut self.state);
            } else {
                panels::installer_panel::installer_panel(ui, &mut self.state);
            }
            ui.add_space(8.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            panels::log_panel::log_panel(ui, &self.state, &self.theme);
        });

        self.quit_dialog(ctx);
    }
}
