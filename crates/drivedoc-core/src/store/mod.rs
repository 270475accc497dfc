/// Catalog stores.
///
/// - [`local`]: JSON catalog file (nested shape) and CSV export (table shape).
/// - [`sheet`]: the [`SheetClient`] seam plus an in-memory implementation.
/// - [`remote`]: catalog and blacklist operations on top of any sheet client.
/// - [`format`]: conditional formatting of a catalog column.
/// - [`google`]: Google Sheets/Drive REST client.
/// - [`credentials`]: service account key location and installation.
pub mod credentials;
pub mod format;
pub mod google;
pub mod local;
pub mod remote;
pub mod sheet;

pub use format::CatalogFormatter;
pub use google::GoogleSheetsClient;
pub use remote::RemoteCatalog;
pub use sheet::{Cell, ConditionalRule, GridRange, MemorySheets, Rgb, SheetClient};

/// Default name of the documentation spreadsheet.
pub const DEFAULT_SPREADSHEET_NAME: &str = "external_drives_docu";

/// Default path of the local JSON catalog.
pub const DEFAULT_LOCAL_CATALOG: &str = "drives_documentation.json";
