/// The spreadsheet seam.
///
/// [`SheetClient`] is the minimal set of spreadsheet operations the catalog
/// logic needs: read all rows of a worksheet, overwrite all rows, and swap
/// the conditional-formatting rules scoped to one column. The Google client
/// implements it over HTTP; [`MemorySheets`] implements it in memory.
use crate::error::StoreError;
use parking_lot::Mutex;

/// A cell value as the spreadsheet API returns it (string, number, bool).
pub type Cell = serde_json::Value;

/// Zero-based, end-exclusive grid range within one worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRange {
    pub start_row: u32,
    pub end_row: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl GridRange {
    /// Whether the range covers exactly one column, `column`.
    pub fn is_column(&self, column: u32) -> bool {
        self.start_column == column && self.end_column == column + 1
    }
}

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// "Text is exactly" rule: bold text on a background colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRule {
    pub range: GridRange,
    pub text_eq: String,
    pub background: Rgb,
}

pub trait SheetClient {
    /// All rows of a worksheet, header first. Trailing empty cells may be
    /// missing from a row.
    fn read_rows(&self, worksheet: usize) -> Result<Vec<Vec<Cell>>, StoreError>;

    /// Clear the worksheet and write `rows` from the top-left cell.
    fn overwrite_rows(&self, worksheet: usize, rows: Vec<Vec<Cell>>) -> Result<(), StoreError>;

    /// Remove every rule whose first range covers exactly `column`, then
    /// append `rules`. Rules on other columns are untouched.
    fn replace_column_rules(
        &self,
        worksheet: usize,
        column: u32,
        rules: Vec<ConditionalRule>,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorksheet {
    pub rows: Vec<Vec<Cell>>,
    pub rules: Vec<ConditionalRule>,
    /// Number of `overwrite_rows` calls received.
    pub writes: usize,
}

/// An in-memory spreadsheet; worksheets are addressed by index like the
/// real one.
#[derive(Debug, Default)]
pub struct MemorySheets {
    worksheets: Mutex<Vec<MemoryWorksheet>>,
}

impl MemorySheets {
    pub fn new(worksheet_count: usize) -> Self {
        Self {
            worksheets: Mutex::new(vec![MemoryWorksheet::default(); worksheet_count]),
        }
    }

    /// Replace the rows of a worksheet without counting it as a write.
    pub fn seed(&self, worksheet: usize, rows: Vec<Vec<Cell>>) {
        if let Some(ws) = self.worksheets.lock().get_mut(worksheet) {
            ws.rows = rows;
        }
    }

    /// Add a rule without going through `replace_column_rules`.
    pub fn seed_rule(&self, worksheet: usize, rule: ConditionalRule) {
        if let Some(ws) = self.worksheets.lock().get_mut(worksheet) {
            ws.rules.push(rule);
        }
    }

    /// Snapshot of a worksheet.
    pub fn worksheet(&self, worksheet: usize) -> Option<MemoryWorksheet> {
        self.worksheets.lock().get(worksheet).cloned()
    }
}

impl SheetClient for MemorySheets {
    fn read_rows(&self, worksheet: usize) -> Result<Vec<Vec<Cell>>, StoreError> {
        self.worksheets
            .lock()
            .get(worksheet)
            .map(|ws| ws.rows.clone())
            .ok_or(StoreError::MissingWorksheet(worksheet))
    }

    fn overwrite_rows(&self, worksheet: usize, rows: Vec<Vec<Cell>>) -> Result<(), StoreError> {
        let mut sheets = self.worksheets.lock();
        let ws = sheets
            .get_mut(worksheet)
            .ok_or(StoreError::MissingWorksheet(worksheet))?;
        ws.rows = rows;
        ws.writes += 1;
        Ok(())
    }

    fn replace_column_rules(
        &self,
        worksheet: usize,
        column: u32,
        rules: Vec<ConditionalRule>,
    ) -> Result<(), StoreError> {
        let mut sheets = self.worksheets.lock();
        let ws = sheets
            .get_mut(worksheet)
            .ok_or(StoreError::MissingWorksheet(worksheet))?;
        ws.rules.retain(|r| !r.range.is_column(column));
        ws.rules.extend(rules);
        Ok(())
    }
}
