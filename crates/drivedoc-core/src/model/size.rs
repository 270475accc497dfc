/// Size conversion utilities: bytes to catalog gigabytes.
///
/// Drive and project sizes are stored in the catalog as gigabytes
/// (binary, 1 GB = 1024³ bytes) rounded to three decimals.
use crate::model::record::UNSCANNABLE_SIZE;

/// Bytes in one catalog gigabyte.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert a byte count to gigabytes, rounded to 3 decimal places.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_GB * 1000.0).round() / 1000.0
}

/// Format a catalog size for display.
///
/// The unscannable sentinel is shown as "n/a" rather than a negative size.
pub fn format_gb(size_gb: f64) -> String {
    if size_gb == UNSCANNABLE_SIZE {
        "n/a".to_string()
    } else {
        format!("{size_gb:.3} GB")
    }
}
