/// Platform-specific drive information: partition enumeration, volume
/// naming, capacity queries, and the "is this an external drive" heuristics.
///
/// The two operating-system families are separate implementations of
/// [`PlatformDriveInfo`]; [`native()`] picks one once at startup and the rest
/// of the crate only talks to the trait.
#[cfg(unix)]
pub mod posix;
#[cfg(windows)]
pub mod win32;

use crate::error::ScanError;
use crate::model::Blacklist;
use std::path::{Path, PathBuf};

#[cfg(unix)]
pub use posix::PosixMountInfo;
#[cfg(windows)]
pub use win32::WindowsVolumeInfo;

/// A mounted filesystem as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Mount point path, e.g. `E:\` or `/media/user/Archive`.
    pub mountpoint: PathBuf,
    /// Filesystem type (`NTFS`, `exfat`, ...). Empty when unmounted/virtual.
    pub fstype: String,
    /// Comma-separated mount options. Optical drives carry `cdrom`.
    pub opts: String,
}

/// Total and free bytes of a mounted volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// OS capability used by the scanner.
pub trait PlatformDriveInfo: Send + Sync {
    /// All mounted partitions.
    fn partitions(&self) -> Result<Vec<Partition>, ScanError>;

    /// Platform-specific physical/removable check.
    fn is_physical(&self, partition: &Partition) -> bool;

    /// Human-readable drive name used in the catalog and blacklist.
    fn display_name(&self, mountpoint: &Path) -> Result<String, ScanError>;

    /// Total and free space of the volume.
    fn capacity(&self, mountpoint: &Path) -> Result<Capacity, ScanError>;
}

/// Whether a partition is an external drive worth documenting.
///
/// Optical drives and partitions without a filesystem type are always
/// rejected before the platform heuristic runs.
pub fn is_external(partition: &Partition, platform: &dyn PlatformDriveInfo) -> bool {
    if partition.opts.to_lowercase().contains("cdrom") {
        return false;
    }
    if partition.fstype.is_empty() {
        return false;
    }
    platform.is_physical(partition)
}

/// Whether the drive at `mountpoint` is on the drive blacklist.
pub fn is_blacklisted(
    mountpoint: &Path,
    blacklist: &Blacklist,
    platform: &dyn PlatformDriveInfo,
) -> Result<bool, ScanError> {
    let name = platform.display_name(mountpoint)?;
    Ok(blacklist.is_drive_blacklisted(&name))
}

/// Final path segment of a mountpoint, falling back to the whole path.
pub fn final_segment_name(mountpoint: &Path) -> String {
    mountpoint
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| mountpoint.to_string_lossy().into_owned())
}

/// The drive-info implementation for the running operating system.
pub fn native() -> Box<dyn PlatformDriveInfo> {
    #[cfg(windows)]
    {
        Box::new(WindowsVolumeInfo::new())
    }
    #[cfg(unix)]
    {
        Box::new(PosixMountInfo::new())
    }
}
