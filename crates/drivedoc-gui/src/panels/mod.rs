/// Panels composing the main window.

pub mod controls_panel;
pub mod installer_panel;
pub mod log_panel;
