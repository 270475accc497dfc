/// DriveDoc Core: drive scanning, catalog merging, and spreadsheet sync.
///
/// This crate contains all business logic with zero UI dependencies.
/// Both the CLI and the GUI drive it through [`pipeline`].
///
/// # Modules
///
/// - [`model`]: Drive/project records, the canonical catalog, blacklists.
/// - [`platform`]: External-drive classification per operating system.
/// - [`scanner`]: Directory filtering, size probing, and drive scanning.
/// - [`merge`]: Merging fresh scans into a previous catalog.
/// - [`store`]: Local JSON/CSV and remote spreadsheet catalog stores.
/// - [`settings`]: The persisted `settings.ini` file.
/// - [`pipeline`]: Scan, merge, upload, format in one pass.
/// - [`worker`]: Single-flight background worker guard.
pub mod error;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod platform;
pub mod scanner;
pub mod settings;
pub mod store;
pub mod worker;

pub use error::{PipelineError, ScanError, SettingsError, StoreError, WorkerError};
