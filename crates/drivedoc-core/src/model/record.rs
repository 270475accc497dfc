/// Drive and project records.
///
/// Field names on the wire follow the spreadsheet headers
/// (`drive-name`, `project-name`, ...) so existing catalogs keep loading.
use serde::{Deserialize, Serialize};

/// Sentinel size for a project whose directory could not be read.
///
/// Distinct from `0.0` (an empty directory). Stored and displayed as-is.
pub const UNSCANNABLE_SIZE: f64 = -1.0;

/// A top-level project directory on a drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(rename = "project-name")]
    pub project_name: String,
    /// Size in GB, or [`UNSCANNABLE_SIZE`].
    #[serde(rename = "size")]
    pub size_gb: f64,
    /// `YYYY-MM-DD` prefix of the directory name, if it has one.
    #[serde(default)]
    pub date: Option<String>,
}

impl ProjectRecord {
    pub fn is_unscannable(&self) -> bool {
        self.size_gb == UNSCANNABLE_SIZE
    }
}

/// One documented drive and its projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveRecord {
    #[serde(rename = "drive-name")]
    pub drive_name: String,
    #[serde(rename = "total-storage")]
    pub total_storage_gb: f64,
    #[serde(rename = "free-storage")]
    pub free_storage_gb: f64,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

impl DriveRecord {
    pub fn new(drive_name: impl Into<String>, total_storage_gb: f64, free_storage_gb: f64) -> Self {
        Self {
            drive_name: drive_name.into(),
            total_storage_gb,
            free_storage_gb,
            projects: Vec::new(),
        }
    }

    /// Append a project unless one with the same name already exists.
    ///
    /// Returns `false` when the project was rejected as a duplicate.
    pub fn push_project(&mut self, project: ProjectRecord) -> bool {
        if self.project(&project.project_name).is_some() {
            return false;
        }
        self.projects.push(project);
        true
    }

    pub fn project(&self, name: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.project_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> ProjectRecord {
        ProjectRecord {
            project_name: name.to_string(),
            size_gb: 0.5,
            date: None,
        }
    }

    #[test]
    fn push_project_rejects_duplicates() {
        let mut drive = DriveRecord::new("Archive", 100.0, 40.0);
        assert!(drive.push_project(project("a")));
        assert!(!drive.push_project(project("a")));
        assert!(drive.push_project(project("b")));
        assert_eq!(drive.projects.len(), 2);
    }

    #[test]
    fn serializes_with_sheet_header_names() {
        let json = serde_json::to_value(ProjectRecord {
            project_name: "2023-01-15_trip".into(),
            size_gb: UNSCANNABLE_SIZE,
            date: Some("2023-01-15".into()),
        })
        .unwrap();
        assert_eq!(json["project-name"], "2023-01-15_trip");
        assert_eq!(json["size"], -1.0);
        assert_eq!(json["date"], "2023-01-15");
    }

    #[test]
    fn unscannable_is_not_zero() {
        let mut p = project("x");
        p.size_gb = 0.0;
        assert!(!p.is_unscannable());
        p.size_gb = UNSCANNABLE_SIZE;
        assert!(p.is_unscannable());
    }
}
