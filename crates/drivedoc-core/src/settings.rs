/// The persisted application settings (`settings.ini`).
///
/// ```ini
/// [General]
/// installed = 0
/// autostart = 0
/// window_width = 500
/// window_height = 400
/// ```
///
/// A missing file is created with the defaults. A value that cannot be read
/// falls back to its default with a warning instead of failing startup.
use crate::error::SettingsError;
use configparser::ini::Ini;
use std::path::Path;
use tracing::{info, warn};

pub const SETTINGS_FILE: &str = "settings.ini";

const SECTION: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// The service account key has been installed.
    pub installed: bool,
    /// Start an update as soon as the window opens.
    pub autostart: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            installed: false,
            autostart: false,
            window_width: 500,
            window_height: 400,
        }
    }
}

impl Settings {
    pub fn load_or_create(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            info!("Creating {} with default settings", path.display());
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|message| SettingsError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse INI text. Missing keys take their defaults.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut ini = Ini::new_cs();
        ini.read(text.to_string())?;

        let defaults = Self::default();
        Ok(Self {
            installed: read_value(&ini, "installed", Ini::getboolcoerce, defaults.installed),
            autostart: read_value(&ini, "autostart", Ini::getboolcoerce, defaults.autostart),
            window_width: read_dimension(&ini, "window_width", defaults.window_width),
            window_height: read_dimension(&ini, "window_height", defaults.window_height),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let flag = |b: bool| Some(if b { "1" } else { "0" }.to_string());
        let mut ini = Ini::new_cs();
        ini.set(SECTION, "installed", flag(self.installed));
        ini.set(SECTION, "autostart", flag(self.autostart));
        ini.set(SECTION, "window_width", Some(self.window_width.to_string()));
        ini.set(SECTION, "window_height", Some(self.window_height.to_string()));
        ini.write(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_value<T: Copy>(
    ini: &Ini,
    key: &str,
    getter: fn(&Ini, &str, &str) -> Result<Option<T>, String>,
    default: T,
) -> T {
    match getter(ini, SECTION, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            warn!("Ignoring invalid setting {key}: {e}");
            default
        }
    }
}

fn read_dimension(ini: &Ini, key: &str, default: u32) -> u32 {
    let value = read_value(ini, key, Ini::getuint, u64::from(default));
    match u32::try_from(value) {
        Ok(v) if v > 0 => v,
        _ => {
            warn!("Ignoring invalid setting {key}: {value}");
            default
        }
    }
}
