/// Cosmetic formatting of the catalog worksheet.
///
/// Each distinct value of a column (by default the drive name) gets its own
/// background colour through "text is exactly" conditional-formatting rules,
/// so all rows of one drive stand out together.
use crate::error::StoreError;
use crate::store::remote::{RemoteCatalog, CATALOG_WORKSHEET, DRIVES_COLUMN};
use crate::store::sheet::{ConditionalRule, GridRange, Rgb, SheetClient};
use tracing::info;

/// Rules always cover at least this many rows so new rows are coloured
/// before the next formatting pass.
const MIN_FORMATTED_ROWS: usize = 990;

pub struct CatalogFormatter<'a, C> {
    remote: &'a RemoteCatalog<C>,
}

impl<'a, C: SheetClient> CatalogFormatter<'a, C> {
    pub fn new(remote: &'a RemoteCatalog<C>) -> Self {
        Self { remote }
    }

    /// Colour every distinct value of `column_name` below the header.
    ///
    /// Existing rules scoped to that column are removed first. Returns the
    /// number of rules installed.
    pub fn color_unique_cells_by_column(&self, column_name: &str) -> Result<usize, StoreError> {
        let records = self.remote.fetch_records(CATALOG_WORKSHEET)?;
        let position = records.column_index(column_name)?;

        let mut values: Vec<String> = Vec::new();
        for value in records.text_column(column_name)? {
            if !value.is_empty() && !values.contains(&value) {
                values.push(value);
            }
        }

        let end_row = MIN_FORMATTED_ROWS.max(records.len());
        let range = GridRange {
            // Row 0 is the header.
            start_row: 1,
            end_row: end_row as u32,
            start_column: position as u32,
            end_column: position as u32 + 1,
        };

        let colors = distinct_colors(values.len());
        let rules: Vec<ConditionalRule> = values
            .into_iter()
            .zip(colors)
            .map(|(text_eq, background)| ConditionalRule {
                range,
                text_eq,
                background,
            })
            .collect();
        let count = rules.len();

        let letter = column_letter(position);
        info!("Colouring {count} value(s) in {letter}2:{letter}{end_row}");
        self.remote
            .client()
            .replace_column_rules(CATALOG_WORKSHEET, position as u32, rules)?;
        Ok(count)
    }

    /// Colour the drive-name column.
    pub fn format_drives_column(&self) -> Result<usize, StoreError> {
        self.color_unique_cells_by_column(DRIVES_COLUMN)
    }
}

/// `n` colours with evenly spaced hues and alternating saturation
/// (0.5 / 0.35) and brightness (0.6 / 0.75).
pub fn distinct_colors(n: usize) -> Vec<Rgb> {
    (0..n)
        .map(|i| {
            let hue = i as f64 / n as f64;
            let saturation = 0.35 + 0.15 * ((i + 1) % 2) as f64;
            let value = 0.6 + 0.15 * (i % 2) as f64;
            hsv_to_rgb(hue, saturation, value)
        })
        .collect()
}

/// Spreadsheet column id of a zero-based column index: 0 → A, 26 → AA.
pub fn column_letter(position: usize) -> String {
    if position > 25 {
        return column_letter(position / 26 - 1) + &column_letter(position % 26);
    }
    char::from(b'A' + position as u8).to_string()
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let rgb = |red, green, blue| Rgb { red, green, blue };
    if s == 0.0 {
        return rgb(v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as i64 % 6 {
        0 => rgb(v, t, p),
        1 => rgb(q, v, p),
        2 => rgb(p, v, t),
        3 => rgb(p, q, v),
        4 => rgb(t, p, v),
        _ => rgb(v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Catalog, DriveRecord, ProjectRecord};
    use crate::store::sheet::MemorySheets;
    use serde_json::json;

    fn close(a: Rgb, b: (f64, f64, f64)) -> bool {
        (a.red - b.0).abs() < 1e-9 && (a.green - b.1).abs() < 1e-9 && (a.blue - b.2).abs() < 1e-9
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(3), "D");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(52), "BA");
    }

    #[test]
    fn colors_alternate_saturation_and_brightness() {
        let colors = distinct_colors(2);
        // i = 0: hue 0, s 0.5, v 0.6
        assert!(close(colors[0], (0.6, 0.3, 0.3)));
        // i = 1: hue 0.5, s 0.35, v 0.75
        assert!(close(colors[1], (0.4875, 0.75, 0.75)));
    }

    #[test]
    fn values_keep_first_appearance_and_skip_blanks() {
        let sheets = MemorySheets::new(1);
        sheets.seed(
            0,
            vec![
                vec![json!("project-name"), json!("drive-name")],
                vec![json!("p"), json!("B")],
                vec![json!("q"), json!("")],
                vec![json!("r"), json!("A")],
                vec![json!("s"), json!("B")],
                vec![json!("t"), json!(7)],
            ],
        );
        let remote = RemoteCatalog::new(sheets);
        assert_eq!(
            CatalogFormatter::new(&remote).format_drives_column().unwrap(),
            3
        );
        let texts: Vec<String> = remote
            .client()
            .worksheet(0)
            .unwrap()
            .rules
            .into_iter()
            .map(|r| r.text_eq)
            .collect();
        assert_eq!(texts, vec!["B", "A", "7"]);
    }

    #[test]
    fn formats_drive_column_and_replaces_old_rules() {
        let sheets = MemorySheets::new(2);
        let remote = RemoteCatalog::new(sheets);
        let drives = ["A", "B"].map(|name| {
            let mut d = DriveRecord::new(name, 1.0, 1.0);
            for p in ["x", "y"] {
                d.push_project(ProjectRecord {
                    project_name: p.into(),
                    size_gb: 0.1,
                    date: None,
                });
            }
            d
        });
        remote.upload(&Catalog::from_drives(drives)).unwrap();

        let formatter = CatalogFormatter::new(&remote);
        assert_eq!(formatter.format_drives_column().unwrap(), 2);
        assert_eq!(formatter.format_drives_column().unwrap(), 2);

        let rules = remote.client().worksheet(CATALOG_WORKSHEET).unwrap().rules;
        assert_eq!(rules.len(), 2);
        // drive-name is the fourth canonical column.
        assert!(rules.iter().all(|r| r.range.is_column(3)));
        assert_eq!(rules[0].range.end_row, 990);
        assert_eq!(rules[0].text_eq, "A");
        assert_ne!(rules[0].background, rules[1].background);
    }

    #[test]
    fn hues_are_spread_over_unique_values_not_rows() {
        let sheets = MemorySheets::new(2);
        let remote = RemoteCatalog::new(sheets);
        let drives = ["A", "B"].map(|name| {
            let mut d = DriveRecord::new(name, 1.0, 1.0);
            for p in ["x", "y", "z"] {
                d.push_project(ProjectRecord {
                    project_name: p.into(),
                    size_gb: 0.1,
                    date: None,
                });
            }
            d
        });
        remote.upload(&Catalog::from_drives(drives)).unwrap();

        CatalogFormatter::new(&remote).format_drives_column().unwrap();
        let rules = remote.client().worksheet(CATALOG_WORKSHEET).unwrap().rules;
        assert_eq!(rules.len(), 2);
        assert!(close(rules[0].background, (0.6, 0.3, 0.3)));
        // Two values: the second hue is 0.5, whatever the row count.
        assert!(close(rules[1].background, (0.4875, 0.75, 0.75)));
    }

    #[test]
    fn missing_column_is_an_error() {
        let sheets = MemorySheets::new(1);
        sheets.seed(0, vec![vec![json!("something-else")]]);
        let remote = RemoteCatalog::new(sheets);
        let err = CatalogFormatter::new(&remote)
            .color_unique_cells_by_column("drive-name")
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn { .. }));
    }
}
