//! Shared fixtures: a platform whose "drives" are temporary directories.
#![allow(dead_code)]

use drivedoc_core::error::ScanError;
use drivedoc_core::platform::{final_segment_name, Capacity, Partition, PlatformDriveInfo};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const GIB: u64 = 1024 * 1024 * 1024;

/// Every partition is physical; the drive name is the directory name and
/// every drive reports 100 GiB total, 40 GiB free.
pub struct TempDrives {
    pub partitions: Vec<Partition>,
}

impl TempDrives {
    pub fn new<P: AsRef<Path>>(mountpoints: &[P]) -> Self {
        Self {
            partitions: mountpoints
                .iter()
                .map(|m| Partition {
                    mountpoint: m.as_ref().to_path_buf(),
                    fstype: "exfat".to_string(),
                    opts: "rw".to_string(),
                })
                .collect(),
        }
    }

    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partitions.push(partition);
        self
    }
}

impl PlatformDriveInfo for TempDrives {
    fn partitions(&self) -> Result<Vec<Partition>, ScanError> {
        Ok(self.partitions.clone())
    }

    fn is_physical(&self, _partition: &Partition) -> bool {
        true
    }

    fn display_name(&self, mountpoint: &Path) -> Result<String, ScanError> {
        Ok(final_segment_name(mountpoint))
    }

    fn capacity(&self, mountpoint: &Path) -> Result<Capacity, ScanError> {
        if !mountpoint.exists() {
            return Err(ScanError::Capacity {
                path: mountpoint.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Ok(Capacity {
            total_bytes: 100 * GIB,
            free_bytes: 40 * GIB,
        })
    }
}

/// Create `root/<name>` and return it.
pub fn make_drive(root: &Path, name: &str) -> PathBuf {
    let drive = root.join(name);
    fs::create_dir_all(&drive).unwrap();
    drive
}

pub fn write_bytes(path: &Path, n: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}
