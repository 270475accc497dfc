/// Catalog merging: folds a fresh scan into the previously stored catalog.
///
/// Rules:
/// - every drive in the fresh scan replaces its previous entry entirely;
/// - drives that are not connected right now keep their previous entry;
/// - the blacklists are applied afterwards, to fresh and stale entries alike.
///
/// Order of the result: the kept stale drives in their previous order,
/// followed by the fresh drives in scan order.
use crate::model::{Blacklist, Catalog, CatalogRow, DriveRecord};

/// Merge `fresh` into `previous` and filter by `blacklist`.
pub fn merge(previous: Catalog, fresh: Catalog, blacklist: &Blacklist) -> Catalog {
    let stale: Vec<DriveRecord> = previous
        .into_drives()
        .into_iter()
        .filter(|d| !fresh.contains_drive(&d.drive_name))
        .collect();

    let combined = Catalog::from_drives(stale.into_iter().chain(fresh.into_drives()));
    apply_blacklist(combined, blacklist)
}

/// Table-shaped variant of [`merge`], for stores that hold flat rows.
pub fn merge_rows(
    previous: Vec<CatalogRow>,
    fresh: Vec<CatalogRow>,
    blacklist: &Blacklist,
) -> Vec<CatalogRow> {
    merge(
        Catalog::from_table(previous),
        Catalog::from_table(fresh),
        blacklist,
    )
    .to_table()
}

/// Drop blacklisted drives, and blacklisted projects from the rest.
pub fn apply_blacklist(catalog: Catalog, blacklist: &Blacklist) -> Catalog {
    if blacklist.is_empty() {
        return catalog;
    }
    Catalog::from_drives(
        catalog
            .into_drives()
            .into_iter()
            .filter(|d| !blacklist.is_drive_blacklisted(&d.drive_name))
            .map(|mut d| {
                d.projects
                    .retain(|p| !blacklist.is_directory_blacklisted(&p.project_name));
                d
            }),
    )
}
