/// Drive and directory blacklists.
///
/// The spreadsheet stores both lists as two columns of unequal length;
/// the shorter column arrives padded with empty cells, which are dropped.
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    /// Drive display names never to document.
    pub drives: BTreeSet<String>,
    /// Top-level directory names never to document.
    pub directories: BTreeSet<String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a blacklist from two ragged columns, dropping empty padding.
    pub fn from_columns<D, F>(drives: D, directories: F) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            drives: non_empty(drives),
            directories: non_empty(directories),
        }
    }

    pub fn is_drive_blacklisted(&self, drive_name: &str) -> bool {
        self.drives.contains(drive_name)
    }

    pub fn is_directory_blacklisted(&self, directory_name: &str) -> bool {
        self.directories.contains(directory_name)
    }

    pub fn is_empty(&self) -> bool {
        self.drives.is_empty() && self.directories.is_empty()
    }
}

fn non_empty<I>(column: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    column
        .into_iter()
        .map(|cell| cell.as_ref().trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect()
}
