/// Directory size probe using `jwalk`.
///
/// Sums the size of every regular file below a directory, at every depth.
/// A symlink to a file counts with its target's size; symlinked directories
/// are not descended into. Nothing inside the tree is filtered: hidden and blacklisted names only
/// matter for the top level of a drive.
///
/// A permission failure anywhere aborts the probe. No partial sums are
/// reported, the directory is marked [`DirSize::Inaccessible`] instead.
use crate::error::ScanError;
use crate::model::size::bytes_to_gb;
use crate::model::UNSCANNABLE_SIZE;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Outcome of a size probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirSize {
    /// Total bytes of all regular files.
    Bytes(u64),
    /// `path` could not be read; the total is unknown.
    Inaccessible { path: PathBuf },
}

impl DirSize {
    pub fn bytes(&self) -> Option<u64> {
        match self {
            Self::Bytes(b) => Some(*b),
            Self::Inaccessible { .. } => None,
        }
    }

    /// Catalog size in GB. The sentinel passes through unconverted.
    pub fn to_gb(&self) -> f64 {
        match self {
            Self::Bytes(b) => bytes_to_gb(*b),
            Self::Inaccessible { .. } => UNSCANNABLE_SIZE,
        }
    }
}

/// Compute the total size of the tree rooted at `path`.
///
/// Errors other than permission denials (a vanished file, an I/O fault)
/// are returned to the caller.
pub fn total_size(path: &Path) -> Result<DirSize, ScanError> {
    sum_tree(path, file_size)
}

/// Walk `path`, sizing each file or symlink entry with `size_of`.
///
/// `size_of` gets the entry path and whether it is a symlink, and returns
/// `None` for entries that do not count.
fn sum_tree<F>(path: &Path, size_of: F) -> Result<DirSize, ScanError>
where
    F: Fn(&Path, bool) -> io::Result<Option<u64>>,
{
    // One drive at a time, one directory at a time: a serial walk keeps the
    // disk head from thrashing on spinning external drives.
    let walker = jwalk::WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    let mut total: u64 = 0;
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let failed_path = err.path().unwrap_or(path).to_path_buf();
                if is_permission_denied(&err) {
                    return Ok(inaccessible(failed_path));
                }
                return Err(ScanError::Probe {
                    path: failed_path,
                    source: io::Error::other(err),
                });
            }
        };

        if let Some(err) = &entry.read_children_error {
            if is_permission_denied(err) {
                return Ok(inaccessible(entry.path()));
            }
        }

        let file_type = entry.file_type();
        if !file_type.is_file() && !file_type.is_symlink() {
            continue;
        }

        let file_path = entry.path();
        match size_of(&file_path, file_type.is_symlink()) {
            Ok(size) => total += size.unwrap_or(0),
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                return Ok(inaccessible(file_path));
            }
            Err(err) => {
                return Err(ScanError::Probe {
                    path: file_path,
                    source: err,
                })
            }
        }
    }

    Ok(DirSize::Bytes(total))
}

/// Size of a walked entry. A symlink counts only when its target is a
/// regular file; dangling or looping links count nothing.
fn file_size(path: &Path, is_symlink: bool) -> io::Result<Option<u64>> {
    if !is_symlink {
        return std::fs::symlink_metadata(path).map(|meta| Some(meta.len()));
    }
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file().then(|| meta.len())),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => Err(err),
        Err(_) => Ok(None),
    }
}

fn is_permission_denied(err: &jwalk::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == ErrorKind::PermissionDenied)
}

fn inaccessible(path: PathBuf) -> DirSize {
    warn!(
        "permission denied accessing {}, folder size could not be calculated",
        path.display()
    );
    DirSize::Inaccessible { path }
}
