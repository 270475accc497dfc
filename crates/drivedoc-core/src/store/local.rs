/// Local catalog file: pretty-printed JSON in the nested-map shape,
/// plus a flat CSV export of the table shape.
use crate::error::StoreError;
use crate::model::{Catalog, DriveRecord};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Load a catalog; a missing file is an empty catalog, not an error.
pub fn load(path: &Path) -> Result<Catalog, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} does not exist: a new file will be created", path.display());
            return Ok(Catalog::new());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let map: BTreeMap<String, DriveRecord> =
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Catalog::from_nested_map(map))
}

/// Overwrite `path` with the catalog as 2-space indented JSON.
pub fn save(path: &Path, catalog: &Catalog) -> Result<(), StoreError> {
    let json =
        serde_json::to_string_pretty(&catalog.to_nested_map()).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, json).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Saved {} drive(s), {} project(s) to {}",
        catalog.len(),
        catalog.project_count(),
        path.display()
    );
    Ok(())
}

/// Write the catalog as CSV, one row per project.
pub fn export_csv(path: &Path, catalog: &Catalog) -> Result<(), StoreError> {
    let csv_error = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in catalog.to_table() {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectRecord;
    use tempfile::TempDir;

    fn sample() -> Catalog {
        let mut drive = DriveRecord::new("Archive", 931.513, 120.007);
        drive.push_project(ProjectRecord {
            project_name: "2023-01-15_trip".into(),
            size_gb: 12.5,
            date: Some("2023-01-15".into()),
        });
        drive.push_project(ProjectRecord {
            project_name: "locked".into(),
            size_gb: -1.0,
            date: None,
        });
        Catalog::from_drives([drive])
    }

    #[test]
    fn missing_file_is_empty_catalog() {
        let tmp = TempDir::new().unwrap();
        let catalog = load(&tmp.path().join("nope.json")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docu.json");
        save(&path, &sample()).unwrap();
        assert_eq!(load(&path).unwrap(), sample());
    }

    #[test]
    fn saved_json_is_nested_and_indented() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docu.json");
        save(&path, &sample()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"Archive\": {\n    \"drive-name\": \"Archive\""));
        assert!(text.contains("\"size\": -1.0"));
        assert!(text.contains("\"date\": null"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docu.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(load(&path), Err(StoreError::Json { .. })));
    }

    #[test]
    fn csv_export_has_table_header() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docu.csv");
        export_csv(&path, &sample()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("project-name,size,date,drive-name,total-storage,free-storage")
        );
        assert_eq!(
            lines.next(),
            Some("2023-01-15_trip,12.5,2023-01-15,Archive,931.513,120.007")
        );
        assert_eq!(lines.next(), Some("locked,-1.0,,Archive,931.513,120.007"));
    }
}
