/// Mount-table based drive information for Linux and macOS.
///
/// External drives are recognised purely by where they are mounted: desktop
/// automounters put removable media under `/media` or `/run/media`-style
/// roots, admins mount under `/mnt`, macOS uses `/Volumes`.
use super::{final_segment_name, Capacity, Partition, PlatformDriveInfo};
use crate::error::ScanError;
use std::ffi::CString;
use std::mem::MaybeUninit;
use std::path::{Path, PathBuf};

/// Mount roots under which a filesystem counts as external.
pub const EXTERNAL_MOUNT_ROOTS: &[&str] = &["/media", "/mnt", "/Volumes"];

#[derive(Debug, Clone)]
pub struct PosixMountInfo {
    roots: Vec<PathBuf>,
}

impl Default for PosixMountInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl PosixMountInfo {
    pub fn new() -> Self {
        Self::with_roots(EXTERNAL_MOUNT_ROOTS.iter().map(PathBuf::from))
    }

    /// Use custom external mount roots instead of the conventional ones.
    pub fn with_roots(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }
}

impl PlatformDriveInfo for PosixMountInfo {
    fn partitions(&self) -> Result<Vec<Partition>, ScanError> {
        read_mount_table()
    }

    fn is_physical(&self, partition: &Partition) -> bool {
        self.roots
            .iter()
            .any(|root| partition.mountpoint.starts_with(root))
    }

    fn display_name(&self, mountpoint: &Path) -> Result<String, ScanError> {
        Ok(final_segment_name(mountpoint))
    }

    fn capacity(&self, mountpoint: &Path) -> Result<Capacity, ScanError> {
        statvfs_capacity(mountpoint)
    }
}

#[cfg(target_os = "linux")]
fn read_mount_table() -> Result<Vec<Partition>, ScanError> {
    let mount_info =
        std::fs::read_to_string("/proc/self/mountinfo").map_err(ScanError::Enumerate)?;
    Ok(parse_mountinfo(&mount_info))
}

#[cfg(not(target_os = "linux"))]
fn read_mount_table() -> Result<Vec<Partition>, ScanError> {
    let output = std::process::Command::new("mount")
        .output()
        .map_err(ScanError::Enumerate)?;
    if !output.status.success() {
        return Err(ScanError::Enumerate(std::io::Error::other(format!(
            "mount exited with {}",
            output.status
        ))));
    }
    Ok(parse_mount_output(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `/proc/self/mountinfo`.
///
/// Field 5 is the mount point, field 6 the per-mount options; the
/// filesystem type is the first field after the ` - ` separator.
/// Malformed lines are skipped.
pub fn parse_mountinfo(input: &str) -> Vec<Partition> {
    input
        .lines()
        .filter_map(|line| {
            let (left, right) = line.split_once(" - ")?;
            let mut fields = left.split_whitespace();
            let mountpoint = fields.nth(4)?;
            let opts = fields.next().unwrap_or_default();
            let fstype = right.split_whitespace().next().unwrap_or_default();
            Some(Partition {
                mountpoint: PathBuf::from(unescape_mount_field(mountpoint)),
                fstype: fstype.to_string(),
                opts: opts.to_string(),
            })
        })
        .collect()
}

/// Parse BSD-style `mount` output:
/// `/dev/disk2s1 on /Volumes/Archive (exfat, local, nodev, nosuid)`.
pub fn parse_mount_output(input: &str) -> Vec<Partition> {
    input
        .lines()
        .filter_map(|line| {
            let (_, rest) = line.split_once(" on ")?;
            let open = rest.rfind(" (")?;
            let mountpoint = &rest[..open];
            let inner = rest[open + 2..].trim_end().strip_suffix(')')?;
            let mut parts = inner.split(',').map(str::trim);
            let fstype = parts.next().unwrap_or_default();
            let opts: Vec<&str> = parts.collect();
            Some(Partition {
                mountpoint: PathBuf::from(mountpoint),
                fstype: fstype.to_string(),
                opts: opts.join(","),
            })
        })
        .collect()
}

/// Decode the `\040`-style octal escapes the kernel uses in mount paths.
fn unescape_mount_field(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'\\'
            && index + 3 < bytes.len()
            && bytes[index + 1..index + 4].iter().all(u8::is_ascii_digit)
        {
            if let Ok(num) = u8::from_str_radix(&value[index + 1..index + 4], 8) {
                output.push(num);
                index += 4;
                continue;
            }
        }
        output.push(bytes[index]);
        index += 1;
    }

    String::from_utf8_lossy(&output).into_owned()
}

fn statvfs_capacity(mountpoint: &Path) -> Result<Capacity, ScanError> {
    let capacity_error = |source| ScanError::Capacity {
        path: mountpoint.to_path_buf(),
        source,
    };

    let c_path = CString::new(mountpoint.to_string_lossy().as_bytes()).map_err(|_| {
        capacity_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "mount point contains a NUL byte",
        ))
    })?;

    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if rc != 0 {
        return Err(capacity_error(std::io::Error::last_os_error()));
    }
    let stat = unsafe { stat.assume_init() };

    let frsize = if stat.f_frsize > 0 {
        stat.f_frsize as u64
    } else {
        stat.f_bsize as u64
    };

    Ok(Capacity {
        total_bytes: (stat.f_blocks as u64).saturating_mul(frsize),
        // Space available to unprivileged users, as `df` reports it.
        free_bytes: (stat.f_bavail as u64).saturating_mul(frsize),
    })
}
