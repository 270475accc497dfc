/// Drive information using the Windows volume API.
///
/// Drives are enumerated from the logical drive strings; a drive is
/// "physical" when it has a volume label and the OS reports it as removable
/// or fixed. Fixed is accepted because many USB disks report themselves
/// as fixed drives.
use super::{Capacity, Partition, PlatformDriveInfo};
use crate::error::ScanError;
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::{Path, PathBuf};
use windows::core::PCWSTR;
use windows::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDriveStringsW, GetVolumeInformationW,
};

// Drive type constants from the Windows API.
const DRIVE_REMOVABLE_VAL: u32 = 2;
const DRIVE_FIXED_VAL: u32 = 3;
const DRIVE_REMOTE_VAL: u32 = 4;
const DRIVE_CDROM_VAL: u32 = 5;
const DRIVE_RAMDISK_VAL: u32 = 6;

/// Drive type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveType {
    Fixed,
    Removable,
    Network,
    CdRom,
    RamDisk,
    Unknown,
}

impl DriveType {
    fn from_raw(raw: u32) -> Self {
        match raw {
            DRIVE_FIXED_VAL => Self::Fixed,
            DRIVE_REMOVABLE_VAL => Self::Removable,
            DRIVE_REMOTE_VAL => Self::Network,
            DRIVE_CDROM_VAL => Self::CdRom,
            DRIVE_RAMDISK_VAL => Self::RamDisk,
            _ => Self::Unknown,
        }
    }

    /// Mount-option style label, `cdrom` for optical drives.
    pub fn option_label(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Removable => "removable",
            Self::Network => "remote",
            Self::CdRom => "cdrom",
            Self::RamDisk => "ramdisk",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WindowsVolumeInfo;

impl WindowsVolumeInfo {
    pub fn new() -> Self {
        Self
    }

    pub fn drive_type(&self, mountpoint: &Path) -> DriveType {
        let root = wide(mountpoint);
        DriveType::from_raw(unsafe { GetDriveTypeW(PCWSTR(root.as_ptr())) })
    }
}

impl PlatformDriveInfo for WindowsVolumeInfo {
    fn partitions(&self) -> Result<Vec<Partition>, ScanError> {
        // GetLogicalDriveStringsW returns null-separated drive root strings.
        let mut buffer = [0u16; 256];
        let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) };
        if len == 0 {
            return Err(ScanError::Enumerate(std::io::Error::last_os_error()));
        }

        let full = OsString::from_wide(&buffer[..len as usize]);
        let full_str = full.to_string_lossy();

        let mut partitions = Vec::new();
        for root in full_str.split('\0').filter(|s| !s.is_empty()) {
            let mountpoint = PathBuf::from(root);
            let drive_type = self.drive_type(&mountpoint);

            // Only local drives.
            if drive_type == DriveType::Network {
                continue;
            }

            // No volume information means no media (empty card reader, no disc).
            let fstype = volume_information(&mountpoint)
                .map(|(_, fs)| fs)
                .unwrap_or_default();

            partitions.push(Partition {
                mountpoint,
                fstype,
                opts: format!("rw,{}", drive_type.option_label()),
            });
        }
        Ok(partitions)
    }

    fn is_physical(&self, partition: &Partition) -> bool {
        match volume_information(&partition.mountpoint) {
            Ok((label, _)) if !label.is_empty() => {}
            _ => return false,
        }
        matches!(
            self.drive_type(&partition.mountpoint),
            DriveType::Removable | DriveType::Fixed
        )
    }

    fn display_name(&self, mountpoint: &Path) -> Result<String, ScanError> {
        volume_information(mountpoint).map(|(label, _)| label)
    }

    fn capacity(&self, mountpoint: &Path) -> Result<Capacity, ScanError> {
        let root = wide(mountpoint);
        let mut free_caller: u64 = 0;
        let mut total: u64 = 0;
        let mut free_total: u64 = 0;
        unsafe {
            GetDiskFreeSpaceExW(
                PCWSTR(root.as_ptr()),
                Some(&mut free_caller as *mut u64),
                Some(&mut total as *mut u64),
                Some(&mut free_total as *mut u64),
            )
        }
        .map_err(|e| ScanError::Capacity {
            path: mountpoint.to_path_buf(),
            source: std::io::Error::other(e),
        })?;

        Ok(Capacity {
            total_bytes: total,
            free_bytes: free_caller,
        })
    }
}

/// Volume label and filesystem name of a drive root.
fn volume_information(mountpoint: &Path) -> Result<(String, String), ScanError> {
    let root = wide(mountpoint);
    let mut label_buf = [0u16; 256];
    let mut fs_buf = [0u16; 256];
    unsafe {
        GetVolumeInformationW(
            PCWSTR(root.as_ptr()),
            Some(&mut label_buf),
            None,
            None,
            None,
            Some(&mut fs_buf),
        )
    }
    .map_err(|e| ScanError::VolumeInfo {
        path: mountpoint.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    Ok((from_wide_nul(&label_buf), from_wide_nul(&fs_buf)))
}

fn wide(path: &Path) -> Vec<u16> {
    path.to_string_lossy()
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect()
}

fn from_wide_nul(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_labels_mark_optical_drives() {
        assert_eq!(DriveType::from_raw(DRIVE_CDROM_VAL).option_label(), "cdrom");
        assert_eq!(DriveType::from_raw(DRIVE_FIXED_VAL), DriveType::Fixed);
        assert_eq!(DriveType::from_raw(99), DriveType::Unknown);
    }

    #[test]
    fn wide_strings_round_trip() {
        let w = wide(Path::new("E:\\"));
        assert_eq!(w.last(), Some(&0));
        assert_eq!(from_wide_nul(&w), "E:\\");
    }

    #[test]
    fn enumeration_does_not_panic() {
        let _ = WindowsVolumeInfo::new().partitions();
    }
}
