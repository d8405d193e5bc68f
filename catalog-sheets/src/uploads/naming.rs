//! Storage names for uploaded files

use chrono::{DateTime, Local};

const PREFIX: &str = "products";
const DEFAULT_EXTENSION: &str = ".xlsx";

/// `products_{yyyyMMdd_HHmmss}_{8 hex}{ext}`, keeping the original extension
pub fn generate_storage_name(original_filename: &str, now: DateTime<Local>) -> String {
    let suffix = format!("{:08x}", rand::random::<u32>());
    format!(
        "{}_{}_{}{}",
        PREFIX,
        now.format("%Y%m%d_%H%M%S"),
        suffix,
        extension(original_filename)
    )
}

/// Extension including the dot, or `.xlsx` when missing or unusable
fn extension(original_filename: &str) -> &str {
    match original_filename.rfind('.') {
        Some(pos) => {
            let ext = &original_filename[pos..];
            if ext.len() > 1 && ext[1..].chars().all(|c| c.is_ascii_alphanumeric()) {
                ext
            } else {
                DEFAULT_EXTENSION
            }
        }
        None => DEFAULT_EXTENSION,
    }
}
