/// Remote catalog operations on top of a [`SheetClient`].
///
/// Worksheet 0 holds the catalog in table shape (header row + one row per
/// project). Worksheet 1 holds the blacklist in two columns of unequal length.
/// Every update is a full rewrite: fetch, merge, filter, clear, write all rows.
use crate::error::StoreError;
use crate::merge;
use crate::model::{Blacklist, Catalog, CatalogRow, TABLE_COLUMNS};
use crate::store::sheet::{Cell, SheetClient};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

pub const CATALOG_WORKSHEET: usize = 0;
pub const BLACKLIST_WORKSHEET: usize = 1;

pub const DRIVES_COLUMN: &str = "drive-name";
pub const PROJECTS_COLUMN: &str = "project-name";
pub const BLACKLIST_DRIVES_COLUMN: &str = "blacklist drives";
pub const BLACKLIST_FOLDERS_COLUMN: &str = "blacklist folders";

pub struct RemoteCatalog<C> {
    client: C,
}

impl<C: SheetClient> RemoteCatalog<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The catalog worksheet as records keyed by header name.
    pub fn fetch_records(&self, worksheet: usize) -> Result<Records, StoreError> {
        Ok(Records::from_rows(worksheet, self.client.read_rows(worksheet)?))
    }

    /// The catalog worksheet as typed rows.
    pub fn fetch_rows(&self) -> Result<Vec<CatalogRow>, StoreError> {
        let records = self.fetch_records(CATALOG_WORKSHEET)?;
        (0..records.len())
            .filter(|&i| !records.is_blank_row(i))
            .map(|i| records.catalog_row(i))
            .collect()
    }

    /// The catalog currently stored in the spreadsheet.
    pub fn fetch_catalog(&self) -> Result<Catalog, StoreError> {
        Ok(Catalog::from_table(self.fetch_rows()?))
    }

    /// Drive and directory blacklists from worksheet 1.
    pub fn load_blacklist(&self) -> Result<Blacklist, StoreError> {
        let records = self.fetch_records(BLACKLIST_WORKSHEET)?;
        let drives = records.text_column(BLACKLIST_DRIVES_COLUMN)?;
        let folders = records.text_column(BLACKLIST_FOLDERS_COLUMN)?;
        let blacklist = Blacklist::from_columns(drives, folders);
        debug!(
            "Loaded blacklist: {} drive(s), {} folder(s)",
            blacklist.drives.len(),
            blacklist.directories.len()
        );
        Ok(blacklist)
    }

    /// Merge the connected drives into the stored catalog and rewrite it.
    ///
    /// The blacklist is re-read right before filtering so edits made while
    /// the scan ran are honoured. Returns the catalog that was uploaded.
    pub fn update_catalog(&self, fresh: Catalog) -> Result<Catalog, StoreError> {
        let previous = self.fetch_catalog()?;
        let blacklist = self.load_blacklist()?;
        let updated = merge::merge(previous, fresh, &blacklist);
        self.upload(&updated)?;
        Ok(updated)
    }

    /// Filter the stored catalog by `blacklist`, rewriting it only when
    /// something was actually removed. Returns whether a write happened.
    pub fn apply_blacklist_online(&self, blacklist: &Blacklist) -> Result<bool, StoreError> {
        let current = self.fetch_catalog()?;
        let filtered = merge::apply_blacklist(current.clone(), blacklist);
        if filtered == current {
            info!("Spreadsheet already matches the blacklist");
            return Ok(false);
        }
        self.upload(&filtered)?;
        Ok(true)
    }

    /// Clear the catalog worksheet and write header plus all rows.
    pub fn upload(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(catalog.project_count() + 1);
        rows.push(TABLE_COLUMNS.iter().map(|c| Value::from(*c)).collect());
        rows.extend(catalog.to_table().into_iter().map(row_cells));
        info!(
            "Uploading {} row(s) for {} drive(s)",
            rows.len() - 1,
            catalog.len()
        );
        self.client.overwrite_rows(CATALOG_WORKSHEET, rows)
    }
}

fn row_cells(row: CatalogRow) -> Vec<Cell> {
    vec![
        Value::from(row.project_name),
        Value::from(row.size_gb),
        Value::from(row.date.unwrap_or_default()),
        Value::from(row.drive_name),
        Value::from(row.total_storage_gb),
        Value::from(row.free_storage_gb),
    ]
}

/// Worksheet rows as records: the first row names the columns, every
/// following row is padded with empty cells to the header width.
#[derive(Debug, Clone, Default)]
pub struct Records {
    worksheet: usize,
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Records {
    pub fn from_rows(worksheet: usize, rows: Vec<Vec<Cell>>) -> Self {
        let mut rows = rows.into_iter();
        let header: Vec<String> = rows
            .next()
            .map(|h| h.iter().map(cell_text).collect())
            .unwrap_or_default();
        let width = header.len();
        let rows = rows
            .map(|mut r| {
                r.resize(width, Value::from(""));
                r
            })
            .collect();
        Self {
            worksheet,
            header,
            rows,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize, StoreError> {
        self.header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| StoreError::MissingColumn {
                worksheet: self.worksheet,
                column: column.to_string(),
            })
    }

    /// Every cell of a column as text, including empty padding cells.
    pub fn text_column(&self, column: &str) -> Result<Vec<String>, StoreError> {
        if self.header.is_empty() {
            return Ok(Vec::new());
        }
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|r| cell_text(&r[idx])).collect())
    }

    /// Whether every cell of data row `index` is empty, e.g. a row the
    /// user cleared by hand.
    pub fn is_blank_row(&self, index: usize) -> bool {
        self.rows[index]
            .iter()
            .all(|cell| cell_text(cell).trim().is_empty())
    }

    /// Parse data row `index` (0 = first row below the header).
    pub fn catalog_row(&self, index: usize) -> Result<CatalogRow, StoreError> {
        let columns: HashMap<&str, usize> = TABLE_COLUMNS
            .iter()
            .map(|c| self.column_index(c).map(|i| (*c, i)))
            .collect::<Result<_, _>>()?;
        let row = &self.rows[index];
        let text = |column: &str| cell_text(&row[columns[column]]);
        let number = |column: &str| {
            cell_number(&row[columns[column]]).ok_or_else(|| StoreError::MalformedRow {
                worksheet: self.worksheet,
                // Spreadsheet row number: 1-based plus the header row.
                row: index + 2,
                message: format!("\"{column}\" is not a number: {}", row[columns[column]]),
            })
        };

        let date = text("date");
        Ok(CatalogRow {
            project_name: text("project-name"),
            size_gb: number("size")?,
            date: (!date.is_empty()).then_some(date),
            drive_name: text("drive-name"),
            total_storage_gb: number("total-storage")?,
            free_storage_gb: number("free-storage")?,
        })
    }
}

/// Text of a cell. Whole numbers lose their `.0` so a drive named `2023`
/// stays `2023`.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn cell_number(cell: &Cell) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DriveRecord, ProjectRecord};
    use crate::store::sheet::MemorySheets;
    use serde_json::json;

    fn header() -> Vec<Cell> {
        TABLE_COLUMNS.iter().map(|c| json!(c)).collect()
    }

    fn remote_with(catalog_rows: Vec<Vec<Cell>>, blacklist_rows: Vec<Vec<Cell>>) -> RemoteCatalog<MemorySheets> {
        let sheets = MemorySheets::new(2);
        sheets.seed(CATALOG_WORKSHEET, catalog_rows);
        sheets.seed(BLACKLIST_WORKSHEET, blacklist_rows);
        RemoteCatalog::new(sheets)
    }

    fn drive(name: &str, projects: &[&str]) -> DriveRecord {
        let mut d = DriveRecord::new(name, 500.0, 100.0);
        for p in projects {
            d.push_project(ProjectRecord {
                project_name: p.to_string(),
                size_gb: 2.5,
                date: None,
            });
        }
        d
    }

    #[test]
    fn fetch_matches_columns_by_header() {
        // Columns in a different order than the canonical one.
        let rows = vec![
            vec![json!("drive-name"), json!("project-name"), json!("size"), json!("date"), json!("total-storage"), json!("free-storage")],
            vec![json!("Archive"), json!("2023-01-15_trip"), json!(1.5), json!("2023-01-15"), json!(931.5), json!(12)],
            vec![json!("Archive"), json!("locked"), json!("-1"), json!(""), json!(931.5), json!(12)],
        ];
        let remote = remote_with(rows, vec![]);
        let catalog = remote.fetch_catalog().unwrap();
        let drive = catalog.get("Archive").unwrap();
        assert_eq!(drive.free_storage_gb, 12.0);
        assert_eq!(drive.projects[0].date.as_deref(), Some("2023-01-15"));
        assert_eq!(drive.projects[1].size_gb, -1.0);
        assert_eq!(drive.projects[1].date, None);
    }

    #[test]
    fn empty_worksheet_is_empty_catalog() {
        let remote = remote_with(vec![], vec![]);
        assert!(remote.fetch_catalog().unwrap().is_empty());
        assert!(remote.load_blacklist().unwrap().is_empty());
    }

    #[test]
    fn malformed_number_reports_sheet_row() {
        let rows = vec![
            header(),
            vec![json!("p"), json!("big"), json!(""), json!("D"), json!(1), json!(1)],
        ];
        let err = remote_with(rows, vec![]).fetch_catalog().unwrap_err();
        assert!(matches!(err, StoreError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn blank_rows_are_skipped() {
        let rows = vec![
            header(),
            vec![json!("a1"), json!(1.0), json!(""), json!("A"), json!(10), json!(5)],
            vec![json!(""), json!(""), json!(""), json!(""), json!(""), json!("")],
            vec![],
            vec![json!("a2"), json!(2.0), json!(""), json!("A"), json!(10), json!(5)],
        ];
        let remote = remote_with(rows, vec![]);
        let catalog = remote.fetch_catalog().unwrap();
        assert_eq!(catalog.project_count(), 2);

        // A blanked row must not block an update either.
        let updated = remote
            .update_catalog(Catalog::from_drives([drive("B", &["b1"])]))
            .unwrap();
        assert_eq!(updated.len(), 2);
        assert_eq!(updated.get("A").unwrap().projects.len(), 2);
    }

    #[test]
    fn blacklist_drops_ragged_padding() {
        let bl_rows = vec![
            vec![json!(BLACKLIST_DRIVES_COLUMN), json!(BLACKLIST_FOLDERS_COLUMN)],
            vec![json!("System"), json!("$RECYCLE.BIN")],
            vec![json!(""), json!("tmp")],
            vec![json!(""), json!(2020)],
        ];
        let bl = remote_with(vec![], bl_rows).load_blacklist().unwrap();
        assert_eq!(bl.drives.len(), 1);
        assert_eq!(bl.directories.len(), 3);
        assert!(bl.is_directory_blacklisted("2020"));
    }

    #[test]
    fn update_merges_filters_and_rewrites() {
        let stored = Catalog::from_drives([drive("A", &["a1"]), drive("B", &["b1", "tmp"])]);
        let remote = remote_with(
            vec![],
            vec![
                vec![json!(BLACKLIST_DRIVES_COLUMN), json!(BLACKLIST_FOLDERS_COLUMN)],
                vec![json!(""), json!("tmp")],
            ],
        );
        remote.upload(&stored).unwrap();

        let updated = remote
            .update_catalog(Catalog::from_drives([drive("A", &["a2"])]))
            .unwrap();
        assert_eq!(updated.drives()[0].drive_name, "B");
        assert!(updated.get("B").unwrap().project("tmp").is_none());
        assert_eq!(updated.get("A").unwrap().projects[0].project_name, "a2");
        assert_eq!(remote.fetch_catalog().unwrap(), updated);
    }

    #[test]
    fn uploaded_header_is_canonical() {
        let remote = remote_with(vec![], vec![]);
        remote.upload(&Catalog::from_drives([drive("A", &["x"])])).unwrap();
        let rows = remote.client().worksheet(CATALOG_WORKSHEET).unwrap().rows;
        assert_eq!(rows[0], header());
        assert_eq!(rows[1][2], json!(""));
    }

    #[test]
    fn apply_blacklist_online_writes_only_on_change() {
        let remote = remote_with(vec![], vec![]);
        remote.upload(&Catalog::from_drives([drive("A", &["x", "y"])])).unwrap();

        let unrelated = Blacklist::from_columns(["Z"], Vec::<String>::new());
        assert!(!remote.apply_blacklist_online(&unrelated).unwrap());
        assert_eq!(remote.client().worksheet(CATALOG_WORKSHEET).unwrap().writes, 1);

        let bl = Blacklist::from_columns(Vec::<String>::new(), ["y"]);
        assert!(remote.apply_blacklist_online(&bl).unwrap());
        assert_eq!(remote.client().worksheet(CATALOG_WORKSHEET).unwrap().writes, 2);
        assert_eq!(remote.fetch_catalog().unwrap().project_count(), 1);
    }

    #[test]
    fn cell_text_formats_whole_numbers() {
        assert_eq!(cell_text(&json!(2023)), "2023");
        assert_eq!(cell_text(&json!(2023.0)), "2023");
        assert_eq!(cell_text(&json!(1.5)), "1.5");
        assert_eq!(cell_text(&Value::Null), "");
    }
}
