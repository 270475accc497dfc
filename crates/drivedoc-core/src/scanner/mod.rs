/// Scanner module: turns the attached external drives into catalog records.
///
/// Scanning is deliberately sequential: drives are scanned one at a time and
/// the project directories on a drive one at a time, each with a blocking
/// [`probe::total_size`] walk.
///
/// Steps per pass:
/// 1. enumerate partitions and keep the external ones ([`platform::is_external`]);
/// 2. skip blacklisted drives;
/// 3. read capacity and display name;
/// 4. keep the eligible top-level directories ([`filter::is_eligible`]);
/// 5. probe each directory's size and read the date from its name.
pub mod filter;
pub mod probe;
pub mod progress;

use crate::error::ScanError;
use crate::model::size::bytes_to_gb;
use crate::model::{Blacklist, Catalog, DriveRecord, ProjectRecord};
use crate::platform::{self, PlatformDriveInfo};
use crossbeam_channel::Sender;
use progress::ScanProgress;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use filter::{date_from_dir_name, is_eligible};
pub use probe::{total_size, DirSize};

/// Scans external drives through a [`PlatformDriveInfo`].
pub struct DriveScanner<'a> {
    platform: &'a dyn PlatformDriveInfo,
    progress_tx: Option<Sender<ScanProgress>>,
}

impl<'a> DriveScanner<'a> {
    pub fn new(platform: &'a dyn PlatformDriveInfo) -> Self {
        Self {
            platform,
            progress_tx: None,
        }
    }

    /// Report per-drive progress and inaccessible folders on `tx`.
    pub fn with_progress(mut self, tx: Sender<ScanProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Mountpoints of all partitions judged to be external drives.
    pub fn external_mountpoints(&self) -> Result<Vec<PathBuf>, ScanError> {
        Ok(self
            .platform
            .partitions()?
            .into_iter()
            .filter(|p| platform::is_external(p, self.platform))
            .map(|p| p.mountpoint)
            .collect())
    }

    /// Scan every external, non-blacklisted drive.
    ///
    /// A capacity or listing failure on any drive aborts the whole pass.
    pub fn scan(&self, blacklist: &Blacklist) -> Result<Catalog, ScanError> {
        let mut catalog = Catalog::new();
        for mountpoint in self.external_mountpoints()? {
            if platform::is_blacklisted(&mountpoint, blacklist, self.platform)? {
                debug!("Skipping blacklisted drive at {}", mountpoint.display());
                continue;
            }
            let drive = self.scan_drive(&mountpoint, &blacklist.directories)?;
            if let Some(previous) = catalog.upsert(drive) {
                warn!(
                    "Two connected drives are named {:?}; keeping {}",
                    previous.drive_name,
                    mountpoint.display()
                );
            }
        }
        Ok(catalog)
    }

    /// Scan one drive: capacity, name, and its eligible project folders.
    pub fn scan_drive(
        &self,
        mountpoint: &Path,
        blacklisted_directories: &BTreeSet<String>,
    ) -> Result<DriveRecord, ScanError> {
        let capacity = self.platform.capacity(mountpoint)?;
        let drive_name = self.platform.display_name(mountpoint)?;
        info!("scanning {drive_name}...");
        self.send(ScanProgress::DriveStarted {
            name: drive_name.clone(),
            mountpoint: mountpoint.to_path_buf(),
        });

        let mut drive = DriveRecord::new(
            drive_name,
            bytes_to_gb(capacity.total_bytes),
            bytes_to_gb(capacity.free_bytes),
        );
        drive.projects = self.scan_directories(mountpoint, blacklisted_directories)?;

        self.send(ScanProgress::DriveFinished {
            name: drive.drive_name.clone(),
            projects: drive.projects.len(),
        });
        Ok(drive)
    }

    /// Eligible immediate children of `parent`, sorted by name.
    pub fn scan_directories(
        &self,
        parent: &Path,
        blacklisted_directories: &BTreeSet<String>,
    ) -> Result<Vec<ProjectRecord>, ScanError> {
        let read_dir_error = |source| ScanError::ReadDir {
            path: parent.to_path_buf(),
            source,
        };

        let mut children = Vec::new();
        for entry in std::fs::read_dir(parent).map_err(read_dir_error)? {
            let path = entry.map_err(read_dir_error)?.path();
            if is_eligible(&path, blacklisted_directories) {
                children.push(path);
            }
        }
        children.sort();

        let mut projects = Vec::with_capacity(children.len());
        for path in children {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let size = total_size(&path)?;
            if let DirSize::Inaccessible { path } = &size {
                self.send(ScanProgress::Inaccessible { path: path.clone() });
            }
            projects.push(ProjectRecord {
                date: date_from_dir_name(&name),
                size_gb: size.to_gb(),
                project_name: name,
            });
        }
        Ok(projects)
    }

    fn send(&self, msg: ScanProgress) {
        if let Some(tx) = &self.progress_tx {
            // A listener that went away must not stop the scan.
            let _ = tx.send(msg);
        }
    }
}
