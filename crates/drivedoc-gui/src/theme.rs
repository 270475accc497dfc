/// Colours of the DriveDoc window.
use crate::state::LogLevel;
use egui::{Color32, Stroke, Visuals};

/// One colour per log level.
#[derive(Debug, Clone, Copy)]
pub struct LogPalette {
    pub info: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub success: Color32,
}

pub struct DriveDocTheme {
    pub panel: Color32,
    pub raised: Color32,
    pub hover: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub border: Color32,
    pub log: LogPalette,
}

impl DriveDocTheme {
    /// Slate background with a teal accent.
    pub fn dark() -> Self {
        Self {
            panel: Color32::from_rgb(0x1b, 0x20, 0x26),
            raised: Color32::from_rgb(0x25, 0x2c, 0x34),
            hover: Color32::from_rgb(0x31, 0x3a, 0x44),
            text: Color32::from_rgb(0xdd, 0xe3, 0xea),
            text_muted: Color32::from_rgb(0x7d, 0x88, 0x94),
            accent: Color32::from_rgb(0x4f, 0xc1, 0xb0),
            border: Color32::from_rgb(0x38, 0x42, 0x4d),
            log: LogPalette {
                info: Color32::from_rgb(0xdd, 0xe3, 0xea),
                warning: Color32::from_rgb(0xe8, 0xb9, 0x5a),
                error: Color32::from_rgb(0xec, 0x6f, 0x6f),
                success: Color32::from_rgb(0x7c, 0xd0, 0x8b),
            },
        }
    }

    pub fn log_color(&self, level: LogLevel) -> Color32 {
        match level {
            LogLevel::Info => self.log.info,
            LogLevel::Warning => self.log.warning,
            LogLevel::Error => self.log.error,
            LogLevel::Success => self.log.success,
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = self.panel;
        visuals.window_fill = self.raised;
        visuals.extreme_bg_color = self.panel;
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        let widgets = &mut visuals.widgets;
        for (state, fill, text) in [
            (&mut widgets.noninteractive, self.panel, self.text),
            (&mut widgets.inactive, self.raised, self.text),
            (&mut widgets.hovered, self.hover, self.accent),
            (&mut widgets.active, self.accent, self.panel),
        ] {
            state.bg_fill = fill;
            state.weak_bg_fill = fill;
            state.fg_stroke = Stroke::new(1.0, text);
        }

        ctx.style_mut(|style| {
            style.visuals = visuals;
            style.spacing.button_padding = egui::vec2(12.0, 6.0);
        });
    }
}
