//! JSON report export

use super::group_by_category;
use crate::error::Result;
use crate::models::CorsResult;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Exports results as a pretty-printed JSON array
pub fn export(results: &[CorsResult], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(output_path, json)?;
    info!("JSON report saved to {}", output_path.display());
    Ok(())
}

/// Writes one file per non-empty category into `dir` and returns the
/// paths written. A failed file is logged and skipped.
pub fn write_categorized(results: &[CorsResult], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (category, bucket) in group_by_category(results) {
        if bucket.is_empty() {
            continue;
        }
        let path = dir.join(category.file_name());
        match export(&bucket, &path) {
            Ok(()) => written.push(path),
            Err(e) => error!("Failed to write {}: {e}", path.display()),
        }
    }
    Ok(written)
}
