/// The canonical catalog and its two serialized shapes.
///
/// In memory a catalog is always an ordered list of [`DriveRecord`]s with
/// unique drive names. It converts explicitly to and from:
///
/// - the **table** shape: one [`CatalogRow`] per project, each row carrying
///   its drive's name and storage columns (spreadsheet, CSV);
/// - the **nested map** shape: drive name → drive record with a `projects`
///   list (local JSON).
///
/// A drive without projects has no rows, so it only survives the nested shape.
use crate::model::record::{DriveRecord, ProjectRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Column order of the table shape.
pub const TABLE_COLUMNS: [&str; 6] = [
    "project-name",
    "size",
    "date",
    "drive-name",
    "total-storage",
    "free-storage",
];

/// A flattened project row: project fields plus its drive's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "project-name")]
    pub project_name: String,
    #[serde(rename = "size")]
    pub size_gb: f64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "drive-name")]
    pub drive_name: String,
    #[serde(rename = "total-storage")]
    pub total_storage_gb: f64,
    #[serde(rename = "free-storage")]
    pub free_storage_gb: f64,
}

impl CatalogRow {
    fn new(drive: &DriveRecord, project: &ProjectRecord) -> Self {
        Self {
            project_name: project.project_name.clone(),
            size_gb: project.size_gb,
            date: project.date.clone(),
            drive_name: drive.drive_name.clone(),
            total_storage_gb: drive.total_storage_gb,
            free_storage_gb: drive.free_storage_gb,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    drives: Vec<DriveRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from drives, later duplicates replacing earlier ones.
    pub fn from_drives(drives: impl IntoIterator<Item = DriveRecord>) -> Self {
        let mut catalog = Self::new();
        for drive in drives {
            catalog.upsert(drive);
        }
        catalog
    }

    pub fn drives(&self) -> &[DriveRecord] {
        &self.drives
    }

    pub fn into_drives(self) -> Vec<DriveRecord> {
        self.drives
    }

    pub fn get(&self, drive_name: &str) -> Option<&DriveRecord> {
        self.drives.iter().find(|d| d.drive_name == drive_name)
    }

    pub fn contains_drive(&self, drive_name: &str) -> bool {
        self.get(drive_name).is_some()
    }

    /// Insert a drive, replacing any drive with the same name in place.
    ///
    /// Returns the replaced record, if there was one.
    pub fn upsert(&mut self, drive: DriveRecord) -> Option<DriveRecord> {
        match self
            .drives
            .iter_mut()
            .find(|d| d.drive_name == drive.drive_name)
        {
            Some(existing) => Some(std::mem::replace(existing, drive)),
            None => {
                self.drives.push(drive);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.drives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drives.is_empty()
    }

    pub fn project_count(&self) -> usize {
        self.drives.iter().map(|d| d.projects.len()).sum()
    }

    /// Flatten into one row per project, in catalog order.
    pub fn to_table(&self) -> Vec<CatalogRow> {
        self.drives
            .iter()
            .flat_map(|drive| drive.projects.iter().map(move |p| CatalogRow::new(drive, p)))
            .collect()
    }

    /// Group rows back into drives, in order of first appearance.
    ///
    /// Storage columns are taken from a drive's first row. A repeated
    /// project name within one drive keeps the first row.
    pub fn from_table(rows: impl IntoIterator<Item = CatalogRow>) -> Self {
        let mut drives: Vec<DriveRecord> = Vec::new();
        for row in rows {
            let idx = match drives.iter().position(|d| d.drive_name == row.drive_name) {
                Some(idx) => idx,
                None => {
                    drives.push(DriveRecord::new(
                        row.drive_name.clone(),
                        row.total_storage_gb,
                        row.free_storage_gb,
                    ));
                    drives.len() - 1
                }
            };
            let project = ProjectRecord {
                project_name: row.project_name,
                size_gb: row.size_gb,
                date: row.date,
            };
            let name = project.project_name.clone();
            if !drives[idx].push_project(project) {
                warn!(
                    "Duplicate project {:?} on drive {:?}, keeping the first row",
                    name, row.drive_name
                );
            }
        }
        Self { drives }
    }

    /// Nested map keyed by drive name.
    pub fn to_nested_map(&self) -> BTreeMap<String, DriveRecord> {
        self.drives
            .iter()
            .map(|d| (d.drive_name.clone(), d.clone()))
            .collect()
    }

    /// Rebuild from a nested map; the map key is authoritative for the name.
    pub fn from_nested_map(map: BTreeMap<String, DriveRecord>) -> Self {
        Self::from_drives(map.into_iter().map(|(name, mut drive)| {
            drive.drive_name = name;
            drive
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(name: &str, projects: &[(&str, f64)]) -> DriveRecord {
        let mut d = DriveRecord::new(name, 931.5, 120.25);
        for (p, size) in projects {
            d.push_project(ProjectRecord {
                project_name: p.to_string(),
                size_gb: *size,
                date: None,
            });
        }
        d
    }

    #[test]
    fn upsert_keeps_drive_names_unique() {
        let mut catalog = Catalog::new();
        catalog.upsert(drive("A", &[("x", 1.0)]));
        catalog.upsert(drive("B", &[]));
        let replaced = catalog.upsert(drive("A", &[("y", 2.0)]));
        assert!(replaced.is_some());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.drives()[0].drive_name, "A");
        assert_eq!(catalog.drives()[0].projects[0].project_name, "y");
    }

    #[test]
    fn table_rows_inherit_drive_fields() {
        let catalog = Catalog::from_drives([drive("A", &[("x", 1.0), ("y", -1.0)])]);
        let rows = catalog.to_table();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.drive_name == "A" && r.total_storage_gb == 931.5));
        assert_eq!(rows[1].size_gb, -1.0);
    }

    #[test]
    fn table_round_trip_preserves_order() {
        let catalog = Catalog::from_drives([
            drive("B", &[("b1", 0.1)]),
            drive("A", &[("a1", 0.2), ("a2", 0.3)]),
        ]);
        assert_eq!(Catalog::from_table(catalog.to_table()), catalog);
    }

    #[test]
    fn from_table_drops_duplicate_projects() {
        let mut rows = Catalog::from_drives([drive("A", &[("x", 1.0)])]).to_table();
        let mut dup = rows[0].clone();
        dup.size_gb = 9.0;
        rows.push(dup);
        let catalog = Catalog::from_table(rows);
        assert_eq!(catalog.project_count(), 1);
        assert_eq!(catalog.drives()[0].projects[0].size_gb, 1.0);
    }

    #[test]
    fn nested_map_round_trip_keeps_empty_drives() {
        let catalog = Catalog::from_drives([drive("A", &[("x", 1.0)]), drive("Empty", &[])]);
        let back = Catalog::from_nested_map(catalog.to_nested_map());
        assert_eq!(back.len(), 2);
        assert!(back.get("Empty").unwrap().projects.is_empty());
        // An empty drive has no rows.
        assert_eq!(Catalog::from_table(catalog.to_table()).len(), 1);
    }
}
