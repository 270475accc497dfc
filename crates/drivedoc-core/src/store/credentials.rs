/// Service account key location and installation.
use crate::error::StoreError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SERVICE_ACCOUNT_FILE: &str = "service_account.json";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a Google service account key file that are needed to
/// obtain an access token. Everything else in the file is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    /// PEM encoded RSA private key.
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Directory the key is expected in: `%APPDATA%\gspread` on Windows,
/// `~/.config/gspread` elsewhere.
pub fn credentials_dir() -> Result<PathBuf, StoreError> {
    #[cfg(windows)]
    let base = dirs::config_dir();
    #[cfg(not(windows))]
    let base = dirs::home_dir().map(|home| home.join(".config"));

    base.map(|dir| dir.join("gspread"))
        .ok_or(StoreError::NoConfigDir)
}

/// Full path of the expected key file.
pub fn credentials_path() -> Result<PathBuf, StoreError> {
    Ok(credentials_dir()?.join(SERVICE_ACCOUNT_FILE))
}

/// Load the key from its expected location.
pub fn load_service_account() -> Result<ServiceAccountKey, StoreError> {
    load_service_account_from(&credentials_path()?)
}

pub fn load_service_account_from(path: &Path) -> Result<ServiceAccountKey, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::MissingCredentials {
                expected: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let key: ServiceAccountKey =
        serde_json::from_str(&text).map_err(|e| StoreError::InvalidCredentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !key.private_key.contains("PRIVATE KEY") {
        return Err(StoreError::InvalidCredentials {
            path: path.to_path_buf(),
            reason: "private_key is not a PEM key".to_string(),
        });
    }
    debug!("Loaded service account {}", key.client_email);
    Ok(key)
}

/// Result of [`install_credentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A key already sits at the expected location; nothing was moved.
    AlreadyInstalled(PathBuf),
    /// No key at the expected location and none in the source directory.
    NotFound { looked_in: PathBuf },
    /// The key was moved to this path.
    Moved(PathBuf),
}

impl InstallOutcome {
    /// Whether the program can now reach the spreadsheet.
    pub fn is_installed(&self) -> bool {
        !matches!(self, InstallOutcome::NotFound { .. })
    }
}

/// Move `service_account.json` from `source_dir` to the expected location.
pub fn install_credentials(source_dir: &Path) -> Result<InstallOutcome, StoreError> {
    install_credentials_to(source_dir, &credentials_path()?)
}

pub fn install_credentials_to(
    source_dir: &Path,
    target: &Path,
) -> Result<InstallOutcome, StoreError> {
    if target.exists() {
        return Ok(InstallOutcome::AlreadyInstalled(target.to_path_buf()));
    }
    let source = source_dir.join(SERVICE_ACCOUNT_FILE);
    if !source.exists() {
        return Ok(InstallOutcome::NotFound {
            looked_in: source_dir.to_path_buf(),
        });
    }

    let write_error = |source| StoreError::Write {
        path: target.to_path_buf(),
        source,
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    // rename fails across filesystems; fall back to copy + remove.
    if fs::rename(&source, target).is_err() {
        fs::copy(&source, target).map_err(write_error)?;
        fs::remove_file(&source).map_err(|e| StoreError::Write {
            path: source.clone(),
            source: e,
        })?;
    }
    info!("{} moved to {}", SERVICE_ACCOUNT_FILE, target.display());
    Ok(InstallOutcome::Moved(target.to_path_buf()))
}
