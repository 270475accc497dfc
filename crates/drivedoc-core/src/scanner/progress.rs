/// Progress reporting: lightweight messages sent from the worker thread
/// to whoever is listening (the GUI log pane) via a crossbeam channel.
use std::fmt;
use std::path::PathBuf;

/// Pipeline stages, announced as they begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadingBlacklist,
    Scanning,
    Uploading,
    Formatting,
}

/// Progress updates sent while a scan or update runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanProgress {
    /// A pipeline stage started.
    Stage(Stage),
    /// A drive passed classification and blacklist checks.
    DriveStarted { name: String, mountpoint: PathBuf },
    /// A non-fatal error: a project directory could not be read.
    Inaccessible { path: PathBuf },
    /// A drive finished scanning.
    DriveFinished { name: String, projects: usize },
}

impl fmt::Display for ScanProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage(Stage::LoadingBlacklist) => write!(f, "Loading blacklist..."),
            Self::Stage(Stage::Scanning) => write!(f, "Scanning drives..."),
            Self::Stage(Stage::Uploading) => write!(f, "Updating Spreadsheet..."),
            Self::Stage(Stage::Formatting) => write!(f, "Formatting Spreadsheet..."),
            Self::DriveStarted { name, mountpoint } => {
                write!(f, "scanning {name} ({})...", mountpoint.display())
            }
            Self::Inaccessible { path } => write!(
                f,
                "permission denied accessing {}, folder size could not be calculated",
                path.display()
            ),
            Self::DriveFinished { name, projects } => {
                write!(f, "{name}: {projects} project folder(s)")
            }
        }
    }
}
