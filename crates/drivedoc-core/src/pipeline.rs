/// One documentation pass, end to end.
///
/// Online: load blacklist, scan, merge into the spreadsheet, colour the
/// drive column. Offline: the same against the local JSON catalog.
use crate::error::PipelineError;
use crate::merge;
use crate::model::{Blacklist, Catalog};
use crate::platform::PlatformDriveInfo;
use crate::scanner::progress::{ScanProgress, Stage};
use crate::scanner::DriveScanner;
use crate::store::{local, CatalogFormatter, RemoteCatalog, SheetClient};
use crossbeam_channel::Sender;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No external drive was found, or all were blacklisted. Nothing was
    /// written.
    NothingToUpdate,
    /// The catalog was rewritten and now holds this many drives and projects.
    Updated { drives: usize, projects: usize },
}

/// Scan attached drives and merge them into the remote catalog.
pub fn run_update<C: SheetClient>(
    remote: &RemoteCatalog<C>,
    platform: &dyn PlatformDriveInfo,
    progress: Option<Sender<ScanProgress>>,
) -> Result<UpdateOutcome, PipelineError> {
    let stage = |s| {
        if let Some(tx) = &progress {
            let _ = tx.send(ScanProgress::Stage(s));
        }
    };

    stage(Stage::LoadingBlacklist);
    let blacklist = remote.load_blacklist()?;

    stage(Stage::Scanning);
    let mut scanner = DriveScanner::new(platform);
    if let Some(tx) = progress.clone() {
        scanner = scanner.with_progress(tx);
    }
    let fresh = scanner.scan(&blacklist)?;
    if fresh.is_empty() {
        info!("No valid drives found; documentation is not updated");
        return Ok(UpdateOutcome::NothingToUpdate);
    }

    stage(Stage::Uploading);
    let updated = remote.update_catalog(fresh)?;

    stage(Stage::Formatting);
    CatalogFormatter::new(remote).format_drives_column()?;

    Ok(UpdateOutcome::Updated {
        drives: updated.len(),
        projects: updated.project_count(),
    })
}

/// Offline variant: merge a scan into the JSON catalog at `path`.
pub fn run_local_update(
    path: &Path,
    platform: &dyn PlatformDriveInfo,
    blacklist: &Blacklist,
) -> Result<Catalog, PipelineError> {
    let previous = local::load(path)?;
    let fresh = DriveScanner::new(platform).scan(blacklist)?;
    let merged = merge::merge(previous, fresh, blacklist);
    local::save(path, &merged)?;
    Ok(merged)
}
