/// Data model for the drive catalog.
///
/// Re-exports the record types, the canonical catalog, and the blacklist.
pub mod blacklist;
pub mod catalog;
pub mod record;
pub mod size;

pub use blacklist::Blacklist;
pub use catalog::{Catalog, CatalogRow, TABLE_COLUMNS};
pub use record::{DriveRecord, ProjectRecord, UNSCANNABLE_SIZE};
