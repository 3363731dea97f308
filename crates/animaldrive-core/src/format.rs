//! Formatting helpers for display values.

/// Format a byte count for display (e.g., "512 B", "1.2 KB", "3.4 MB").
///
/// Unknown sizes render as "-".
pub fn format_size(size: Option<u64>) -> String {
    const KB: f64 = 1_000.0;
    const MB: f64 = 1_000_000.0;
    const GB: f64 = 1_000_000_000.0;

    match size {
        None => "-".to_string(),
        Some(bytes) => {
            let value = bytes as f64;
            if value >= GB {
                format!("{:.1} GB", value / GB)
            } else if value >= MB {
                format!("{:.1} MB", value / MB)
            } else if value >= KB {
                format!("{:.1} KB", value / KB)
            } else {
                format!("{} B", bytes)
            }
        }
    }
}
