/// Error types for scanning and catalog storage.
use std::path::PathBuf;
use thiserror::Error;

/// Failures while enumerating or scanning drives.
///
/// Permission problems inside a project directory are not errors; they
/// become the unscannable size sentinel instead.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to enumerate mounted partitions: {0}")]
    Enumerate(#[source] std::io::Error),

    #[error("failed to read volume information for {path}: {source}")]
    VolumeInfo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read capacity of {path}: {source}")]
    Capacity {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to measure {path}: {source}")]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the local and remote catalog stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid catalog: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV export to {path} failed: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "service_account.json is needed to access the spreadsheet. \
         Move it to {}",
        expected.display()
    )]
    MissingCredentials { expected: PathBuf },

    #[error("no configuration directory is known for this platform")]
    NoConfigDir,

    #[error("service account key {path} is invalid: {reason}")]
    InvalidCredentials { path: PathBuf, reason: String },

    #[error("could not sign the service account token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid spreadsheet URL: {0}")]
    Url(String),

    #[error("spreadsheet API returned {status} for {context}: {body}")]
    Api {
        status: u16,
        context: String,
        body: String,
    },

    #[error("spreadsheet \"{0}\" not found or not shared with the service account")]
    SpreadsheetNotFound(String),

    #[error("worksheet {0} does not exist")]
    MissingWorksheet(usize),

    #[error("worksheet {worksheet} has no \"{column}\" column")]
    MissingColumn { worksheet: usize, column: String },

    #[error("worksheet {worksheet}, row {row}: {message}")]
    MalformedRow {
        worksheet: usize,
        row: usize,
        message: String,
    },
}

/// Failures reading or writing the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is malformed: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Failure of a whole update pass.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures starting a background update.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("A process is already running.")]
    AlreadyRunning,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}
